//! Document detail page.
//!
//! A page starts in `Loading` and ends in either `Ready` or `Failed`; both
//! are final for that visit. Content that is simply missing is replaced by
//! a placeholder and counts as `Ready`.

use crate::catalog::Catalog;
use crate::models::Document;
use crate::routes::ROOT;
use content::{ContentError, ContentStore};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Store,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub id: String,
    /// Catalog metadata; `None` hides the page header.
    pub meta: Option<Document>,
    pub markdown: String,
    pub origin: ContentOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Document ID not found")]
    MissingId,
    #[error("Failed to load document")]
    Fetch { id: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading { id: Option<String> },
    Ready(PageContent),
    Failed(PageError),
}

impl PageState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PageState::Loading { .. })
    }

    /// Where the "back" action of the error view leads.
    pub fn retreat_href(&self) -> Option<&'static str> {
        match self {
            PageState::Failed(_) => Some(ROOT),
            _ => None,
        }
    }
}

pub fn placeholder_markdown(title: &str) -> String {
    // trailing spaces on two lines are part of the text
    format!(
        "# {title}\n\
         \n\
         This document is under construction. \n\
         \n\
         ## Coming Soon\n\
         \n\
         We're working on creating comprehensive documentation for this topic. Please check back later!\n\
         \n\
         ### What to expect:\n\
         \n\
         - Detailed explanations and examples\n\
         - Code snippets and best practices  \n\
         - Step-by-step tutorials\n\
         - Additional resources and references\n\
         \n\
         ---\n\
         \n\
         *This page will be updated soon with complete content.*"
    )
}

/// Runs one visit of the detail page to its final state.
pub async fn load_page(id: Option<&str>, catalog: &Catalog, store: &dyn ContentStore) -> PageState {
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        return PageState::Failed(PageError::MissingId);
    };
    let meta = catalog.find(id).cloned();

    match store.fetch(id).await {
        Ok(markdown) => PageState::Ready(PageContent {
            id: id.to_string(),
            meta,
            markdown,
            origin: ContentOrigin::Store,
        }),
        Err(ContentError::NotFound(_)) => {
            debug!(id, store = store.name(), "content pending, using placeholder");
            let title = meta.as_ref().map(|m| m.title.as_str()).unwrap_or(id);
            let markdown = placeholder_markdown(title);
            PageState::Ready(PageContent {
                id: id.to_string(),
                meta,
                markdown,
                origin: ContentOrigin::Placeholder,
            })
        }
        Err(err) => {
            error!(id, store = store.name(), error = %err, "error loading document");
            PageState::Failed(PageError::Fetch {
                id: id.to_string(),
                detail: err.to_string(),
            })
        }
    }
}

/// Identifies one navigation; only the latest ticket may publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    id: Option<String>,
}

impl Ticket {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub generation: u64,
    pub state: PageState,
}

/// Detail page driver that survives rapid navigation.
///
/// Each `begin` supersedes the previous visit; a fetch that completes for a
/// superseded visit is dropped instead of overwriting the newer page.
pub struct PageLoader {
    catalog: Arc<Catalog>,
    store: Arc<dyn ContentStore>,
    tx: watch::Sender<PageSnapshot>,
}

impl PageLoader {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn ContentStore>) -> Self {
        let (tx, _rx) = watch::channel(PageSnapshot {
            generation: 0,
            state: PageState::Loading { id: None },
        });
        Self { catalog, store, tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> PageSnapshot {
        self.tx.borrow().clone()
    }

    pub fn begin(&self, id: Option<&str>) -> Ticket {
        let mut generation = 0;
        self.tx.send_modify(|snap| {
            generation = snap.generation + 1;
            *snap = PageSnapshot {
                generation,
                state: PageState::Loading {
                    id: id.map(str::to_string),
                },
            };
        });
        Ticket {
            generation,
            id: id.map(str::to_string),
        }
    }

    /// Abandons the current visit, e.g. on navigating back to the list.
    /// A fetch still in flight for it will not be published.
    pub fn leave(&self) {
        self.tx.send_modify(|snap| {
            *snap = PageSnapshot {
                generation: snap.generation + 1,
                state: PageState::Loading { id: None },
            };
        });
    }

    /// Publishes `state` if `ticket` is still the latest visit.
    pub fn finish(&self, ticket: &Ticket, state: PageState) -> bool {
        self.tx.send_if_modified(|snap| {
            if snap.generation != ticket.generation {
                debug!(
                    id = ticket.id.as_deref().unwrap_or(""),
                    stale = ticket.generation,
                    current = snap.generation,
                    "dropping stale page load"
                );
                return false;
            }
            snap.state = state;
            true
        })
    }

    /// Loads a ticket's page without publishing it.
    pub async fn fetch(&self, ticket: &Ticket) -> PageState {
        load_page(ticket.id(), &self.catalog, self.store.as_ref()).await
    }

    /// Begins a visit, loads it and publishes the result if still current.
    pub async fn open(&self, id: Option<&str>) -> (Ticket, bool) {
        let ticket = self.begin(id);
        let state = self.fetch(&ticket).await;
        let applied = self.finish(&ticket, state);
        (ticket, applied)
    }
}
