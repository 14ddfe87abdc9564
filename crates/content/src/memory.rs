use crate::{ContentError, ContentStore};
use std::collections::{HashMap, HashSet};

/// In-process store, mostly for tests and demos.
///
/// Ids registered with `with_failure` answer every request with an `Io`
/// error, which lets callers exercise the hard-failure path.
#[derive(Debug, Default, Clone)]
pub struct MemoryContentStore {
    documents: HashMap<String, String>,
    assets: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, id: &str, markdown: &str) -> Self {
        self.documents.insert(id.to_string(), markdown.to_string());
        self
    }

    pub fn with_asset(mut self, id: &str, rel: &str, bytes: &[u8]) -> Self {
        self.assets.insert(format!("{id}/{rel}"), bytes.to_vec());
        self
    }

    pub fn with_failure(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch(&self, id: &str) -> Result<String, ContentError> {
        if self.failing.contains(id) {
            return Err(ContentError::Io(format!("simulated failure for {id}")));
        }
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    async fn fetch_asset(&self, id: &str, rel: &str) -> Result<Vec<u8>, ContentError> {
        if self.failing.contains(id) {
            return Err(ContentError::Io(format!("simulated failure for {id}")));
        }
        let key = format!("{id}/{rel}");
        self.assets
            .get(&key)
            .cloned()
            .ok_or(ContentError::NotFound(key))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
