//! Site routes: the catalog root and the per-document detail page.

use crate::search::CategorySelection;
use url::form_urlencoded;

pub const ROOT: &str = "/";
pub const DOCS_PREFIX: &str = "/docs";
pub const CATEGORY_PREFIX: &str = "/category";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index {
        query: String,
        category: CategorySelection,
    },
    /// `None` when the detail route was entered without an id.
    Document(Option<String>),
}

impl Route {
    pub fn root() -> Self {
        Route::Index {
            query: String::new(),
            category: CategorySelection::All,
        }
    }

    /// Resolves a request path (without query string) to a route.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::root());
        }
        let rest = trimmed.strip_prefix(DOCS_PREFIX)?;
        if rest.is_empty() {
            return Some(Route::Document(None));
        }
        let id = rest.strip_prefix('/')?;
        if id.contains('/') {
            return None;
        }
        Some(Route::Document(Some(decode_segment(id))))
    }

    pub fn href(&self) -> String {
        match self {
            Route::Index { query, category } => {
                let mut params = form_urlencoded::Serializer::new(String::new());
                if !query.is_empty() {
                    params.append_pair("q", query);
                }
                if !category.is_all() {
                    params.append_pair("category", category.as_str());
                }
                let encoded = params.finish();
                if encoded.is_empty() {
                    ROOT.to_string()
                } else {
                    format!("{ROOT}?{encoded}")
                }
            }
            Route::Document(Some(id)) => doc_href(id),
            Route::Document(None) => format!("{DOCS_PREFIX}/"),
        }
    }
}

pub fn doc_href(id: &str) -> String {
    format!("{DOCS_PREFIX}/{}", encode_segment(id))
}

/// Base that relative links inside a document body resolve against.
pub fn doc_base(id: &str) -> String {
    format!("{}/", doc_href(id))
}

/// Pre-rendered category page used by the static export.
pub fn category_page_href(selection: &CategorySelection) -> String {
    match selection {
        CategorySelection::All => ROOT.to_string(),
        CategorySelection::Named(name) => format!("{CATEGORY_PREFIX}/{}/", encode_segment(name)),
    }
}

fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn decode_segment(segment: &str) -> String {
    // form decoding treats '+' as a space; keep it literal in paths.
    let escaped = segment.replace('+', "%2B");
    form_urlencoded::parse(format!("s={escaped}").as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| segment.to_string())
}
