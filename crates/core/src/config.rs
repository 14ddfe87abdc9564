use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub catalog: CatalogConfig,
    pub content: ContentConfig,
    pub server: ServerConfig,
    pub markdown: MarkdownConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    pub stats: Vec<HeroStat>,
    /// How many entries the "recently updated" block shows.
    pub recent_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "锦恢 | 文档库".to_string(),
            tagline: "Mirror the unknown".to_string(),
            stats: vec![
                HeroStat::new("10+", "技术文档"),
                HeroStat::new("5+", "开源项目"),
                HeroStat::new("2+", "精选读物"),
            ],
            recent_limit: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroStat {
    pub value: String,
    pub label: String,
}

impl HeroStat {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountPolicy {
    /// Keep the counts written in the catalog file.
    #[default]
    Authored,
    /// Recount from the documents at load time.
    Derived,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML catalog file; the built-in catalog is used when unset.
    pub path: Option<String>,
    pub counts: CountPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// `fs` or `http`.
    pub provider: String,
    pub root: String,
    pub base_url: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            provider: "fs".to_string(),
            root: "docs".to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub allow_raw_html: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            allow_raw_html: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub out_dir: String,
    /// Globs (relative to the content root) left out of the copied attachments.
    pub exclude: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: "dist".to_string(),
            exclude: vec!["**/.*".to_string()],
        }
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
