use crate::{is_safe_relative, is_safe_segment, ContentError, ContentStore, INDEX_FILE};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serves `{root}/{id}/index.md` from the local filesystem.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str, rel: &str) -> Option<PathBuf> {
        if !is_safe_segment(id) || !is_safe_relative(rel) {
            return None;
        }
        let mut path = self.root.join(id);
        for segment in rel.split('/') {
            path.push(segment);
        }
        Some(path)
    }
}

fn map_io(err: std::io::Error, path: &Path, key: String) -> ContentError {
    if err.kind() == ErrorKind::NotFound {
        ContentError::NotFound(key)
    } else {
        ContentError::Io(format!("{}: {}", path.display(), err))
    }
}

#[async_trait::async_trait]
impl ContentStore for FsContentStore {
    async fn fetch(&self, id: &str) -> Result<String, ContentError> {
        let Some(path) = self.resolve(id, INDEX_FILE) else {
            debug!(id, "rejecting unsafe document id");
            return Err(ContentError::NotFound(id.to_string()));
        };
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| map_io(e, &path, id.to_string()))
    }

    async fn fetch_asset(&self, id: &str, rel: &str) -> Result<Vec<u8>, ContentError> {
        let key = format!("{id}/{rel}");
        let Some(path) = self.resolve(id, rel) else {
            return Err(ContentError::NotFound(key));
        };
        tokio::fs::read(&path).await.map_err(|e| map_io(e, &path, key))
    }

    fn name(&self) -> &'static str {
        "fs"
    }
}
