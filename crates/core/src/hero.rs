use crate::config::{HeroStat, SiteConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroView {
    pub title: String,
    pub tagline: String,
    pub stats: Vec<HeroStat>,
}

impl From<&SiteConfig> for HeroView {
    fn from(site: &SiteConfig) -> Self {
        Self {
            title: site.title.clone(),
            tagline: site.tagline.clone(),
            stats: site.stats.clone(),
        }
    }
}
