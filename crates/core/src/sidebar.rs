//! Category sidebar: a controlled view, it never owns the selection.

use crate::index::Intent;
use crate::models::{Category, Document};
use crate::routes::doc_href;
use crate::search::CategorySelection;

pub const ALL_LABEL: &str = "全部文档";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub selection: CategorySelection,
    pub label: String,
    pub count: usize,
    pub color: Option<String>,
    pub selected: bool,
}

impl SidebarEntry {
    /// What clicking this row asks the owner to do.
    pub fn intent(&self) -> Intent {
        Intent::SelectCategory(self.selection.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    pub title: String,
    pub date: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub entries: Vec<SidebarEntry>,
    pub recent: Vec<RecentEntry>,
}

impl SidebarView {
    pub fn build(
        categories: &[Category],
        selected: &CategorySelection,
        recent: Vec<RecentEntry>,
    ) -> Self {
        let total = categories.iter().map(|c| c.count).sum();
        let mut entries = Vec::with_capacity(categories.len() + 1);
        entries.push(SidebarEntry {
            selection: CategorySelection::All,
            label: ALL_LABEL.to_string(),
            count: total,
            color: None,
            selected: selected.is_all(),
        });
        for category in categories {
            let selection = CategorySelection::named(&category.name);
            entries.push(SidebarEntry {
                selected: &selection == selected,
                selection,
                label: category.name.clone(),
                count: category.count,
                color: category.color.clone(),
            });
        }
        let mut view = Self { entries, recent };
        // An unknown category still highlights exactly one row.
        if view.selected().is_none() {
            if let Some(all) = view.entries.first_mut() {
                all.selected = true;
            }
        }
        view
    }

    pub fn all_count(&self) -> usize {
        self.entries.first().map(|e| e.count).unwrap_or(0)
    }

    pub fn selected(&self) -> Option<&SidebarEntry> {
        self.entries.iter().find(|e| e.selected)
    }
}

/// The `limit` most recently dated documents, newest first.
///
/// Undated (or oddly dated) documents sort after dated ones, keeping
/// their catalog order.
pub fn recent_documents(documents: &[Document], limit: usize) -> Vec<RecentEntry> {
    let mut ordered: Vec<(usize, &Document)> = documents.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da).then(ia.cmp(ib)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => ia.cmp(ib),
    });
    ordered
        .into_iter()
        .take(limit)
        .map(|(_, doc)| RecentEntry {
            title: doc.title.clone(),
            date: doc.date.clone(),
            href: doc_href(&doc.id),
        })
        .collect()
}
