use crate::catalog::{self, Catalog};
use crate::config::{AppConfig, ContentConfig};
use crate::hero::HeroView;
use crate::html::{self, LinkStyle};
use crate::index::{IndexController, IndexState, IndexView};
use crate::markdown::MarkdownRenderer;
use crate::page::{self, PageLoader, PageState};
use anyhow::{bail, Context};
use content::fs::FsContentStore;
use content::http::HttpContentStore;
use content::ContentStore;
use std::sync::Arc;
use tracing::info;

/// Everything a front end needs to show the site.
#[derive(Clone)]
pub struct Site {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn ContentStore>,
    pub renderer: MarkdownRenderer,
}

impl Site {
    pub fn new(config: AppConfig, catalog: Arc<Catalog>, store: Arc<dyn ContentStore>) -> Self {
        let renderer = MarkdownRenderer::new(config.markdown.allow_raw_html);
        Self {
            config,
            catalog,
            store,
            renderer,
        }
    }

    /// Process startup: loads and installs the catalog, then opens the store.
    pub fn bootstrap(config: AppConfig) -> anyhow::Result<Self> {
        let catalog = catalog::install(Catalog::load(&config.catalog)?).context("install catalog")?;
        let store = build_store(&config.content)?;
        info!(store = store.name(), "content store ready");
        Ok(Self::new(config, catalog, store))
    }

    pub fn hero(&self) -> HeroView {
        HeroView::from(&self.config.site)
    }

    pub fn index_view(&self, state: &IndexState) -> IndexView {
        IndexView::derive(&self.catalog, state, self.config.site.recent_limit)
    }

    pub fn index_controller(&self) -> IndexController {
        IndexController::new(self.catalog.clone(), self.config.site.recent_limit)
    }

    pub fn render_index(&self, state: &IndexState, style: LinkStyle) -> String {
        html::render_index(&self.hero(), &self.index_view(state), style)
    }

    pub async fn load_page(&self, id: Option<&str>) -> PageState {
        page::load_page(id, &self.catalog, self.store.as_ref()).await
    }

    pub fn page_loader(&self) -> PageLoader {
        PageLoader::new(self.catalog.clone(), self.store.clone())
    }

    pub fn render_page(&self, state: &PageState) -> String {
        html::render_document(state, &self.renderer, &self.config.site.title)
    }
}

pub fn build_store(cfg: &ContentConfig) -> anyhow::Result<Arc<dyn ContentStore>> {
    match cfg.provider.as_str() {
        "fs" => Ok(Arc::new(FsContentStore::new(&cfg.root))),
        "http" => {
            let Some(base) = &cfg.base_url else {
                bail!("content.base_url is required for the http provider");
            };
            Ok(Arc::new(HttpContentStore::new(base)?))
        }
        other => bail!("unknown content provider: {other}"),
    }
}
