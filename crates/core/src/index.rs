//! Index page: owns the UI state and derives everything shown from it.
//!
//! Children never touch the state. They hand back an [`Intent`], the
//! controller applies it, recomputes the [`IndexView`] and publishes the
//! new snapshot to every subscriber.

use crate::card::DocumentCard;
use crate::catalog::Catalog;
use crate::search::{filter_documents, CategorySelection};
use crate::sidebar::{recent_documents, SidebarView};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub const ALL_HEADING: &str = "所有文档";
pub const EMPTY_TITLE: &str = "没有找到匹配的文档";
pub const EMPTY_HINT: &str = "尝试更改搜索条件或选择不同的分类";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetQuery(String),
    SelectCategory(CategorySelection),
    ClearFilters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexState {
    pub query: String,
    pub selected: CategorySelection,
}

impl IndexState {
    pub fn new(query: &str, selected: CategorySelection) -> Self {
        Self {
            query: query.to_string(),
            selected,
        }
    }

    /// Returns whether anything changed.
    pub fn apply(&mut self, intent: Intent) -> bool {
        let before = self.clone();
        match intent {
            Intent::SetQuery(query) => self.query = query,
            Intent::SelectCategory(selection) => self.selected = selection,
            Intent::ClearFilters => *self = Self::default(),
        }
        *self != before
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: String,
    pub hint: String,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            title: EMPTY_TITLE.to_string(),
            hint: EMPTY_HINT.to_string(),
        }
    }
}

/// Immutable snapshot of everything the index page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexView {
    pub state: IndexState,
    pub heading: String,
    pub result_count: usize,
    pub cards: Vec<DocumentCard>,
    pub sidebar: SidebarView,
    pub empty: Option<EmptyState>,
}

impl IndexView {
    pub fn derive(catalog: &Catalog, state: &IndexState, recent_limit: usize) -> Self {
        let cards: Vec<DocumentCard> =
            filter_documents(catalog.documents(), &state.query, &state.selected)
                .into_iter()
                .map(DocumentCard::from)
                .collect();
        let heading = match &state.selected {
            CategorySelection::All => ALL_HEADING.to_string(),
            CategorySelection::Named(name) => name.clone(),
        };
        let sidebar = SidebarView::build(
            catalog.categories(),
            &state.selected,
            recent_documents(catalog.documents(), recent_limit),
        );
        Self {
            state: state.clone(),
            heading,
            result_count: cards.len(),
            empty: cards.is_empty().then(EmptyState::default),
            cards,
            sidebar,
        }
    }
}

/// Holds the canonical index state and pushes a fresh view after each change.
pub struct IndexController {
    catalog: Arc<Catalog>,
    recent_limit: usize,
    state: IndexState,
    tx: watch::Sender<Arc<IndexView>>,
}

impl IndexController {
    pub fn new(catalog: Arc<Catalog>, recent_limit: usize) -> Self {
        let state = IndexState::default();
        let view = Arc::new(IndexView::derive(&catalog, &state, recent_limit));
        let (tx, _rx) = watch::channel(view);
        Self {
            catalog,
            recent_limit,
            state,
            tx,
        }
    }

    pub fn state(&self) -> &IndexState {
        &self.state
    }

    pub fn view(&self) -> Arc<IndexView> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<IndexView>> {
        self.tx.subscribe()
    }

    pub fn dispatch(&mut self, intent: Intent) -> Arc<IndexView> {
        debug!(?intent, "index intent");
        if self.state.apply(intent) {
            let view = Arc::new(IndexView::derive(
                &self.catalog,
                &self.state,
                self.recent_limit,
            ));
            self.tx.send_replace(view);
        }
        self.view()
    }
}
