//! Free-text and category filtering over the catalog.

use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token that selects every category.
pub const ALL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategorySelection {
    #[default]
    All,
    Named(String),
}

impl CategorySelection {
    pub fn named(name: &str) -> Self {
        Self::from(name)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Named(name) => name,
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => doc.category == *name,
        }
    }
}

impl From<&str> for CategorySelection {
    fn from(raw: &str) -> Self {
        if raw == ALL {
            Self::All
        } else {
            Self::Named(raw.to_string())
        }
    }
}

impl From<String> for CategorySelection {
    fn from(raw: String) -> Self {
        if raw == ALL {
            Self::All
        } else {
            Self::Named(raw)
        }
    }
}

impl From<CategorySelection> for String {
    fn from(sel: CategorySelection) -> Self {
        match sel {
            CategorySelection::All => ALL.to_string(),
            CategorySelection::Named(name) => name,
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive substring match against title, description or any tag.
/// An empty query matches everything.
pub fn matches_query(doc: &Document, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = fold_case(query);
    fold_case(&doc.title).contains(&needle)
        || doc
            .description
            .as_deref()
            .is_some_and(|d| fold_case(d).contains(&needle))
        || doc.tags.iter().any(|t| fold_case(t).contains(&needle))
}

/// Per-char lowercase; unlike `str::to_lowercase` it ignores word position
/// (final sigma), so folding `a + b` equals folding `a` then `b`.
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Documents passing both the category and the text predicate, in input order.
pub fn filter_documents<'a, I>(docs: I, query: &str, selection: &CategorySelection) -> Vec<&'a Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    docs.into_iter()
        .filter(|doc| selection.matches(doc) && matches_query(doc, query))
        .collect()
}
