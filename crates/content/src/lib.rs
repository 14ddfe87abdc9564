//! Content store abstractions: markdown bodies addressed by document id.

use thiserror::Error;

pub mod fs;
pub mod http;
pub mod memory;
pub mod mime;

/// File name of a document body inside its id directory.
pub const INDEX_FILE: &str = "index.md";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content not found: {0}")]
    NotFound(String),
    #[error("content store failure: {0}")]
    Io(String),
    #[error("invalid content store url: {0}")]
    InvalidBaseUrl(String),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}

/// External collaborator that serves markdown bodies by document id.
///
/// `fetch` resolves `{id}/index.md` relative to the store root. A missing
/// body is `NotFound`; anything that went wrong while talking to the store
/// is `Io`.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<String, ContentError>;

    /// Attachments stored next to a document body (images and the like).
    async fn fetch_asset(&self, id: &str, path: &str) -> Result<Vec<u8>, ContentError> {
        Err(ContentError::NotFound(format!("{id}/{path}")))
    }

    fn name(&self) -> &'static str;
}

/// A single path segment that cannot escape the store root.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(|c| matches!(c, '/' | '\\' | '\0'))
}

/// A `/`-separated relative path made only of safe segments.
pub fn is_safe_relative(path: &str) -> bool {
    !path.is_empty() && path.split('/').all(is_safe_segment)
}
