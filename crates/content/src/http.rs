use crate::{is_safe_relative, is_safe_segment, ContentError, ContentStore, INDEX_FILE};
use reqwest::{Client, Response};
use url::Url;

/// Fetches `{base_url}/{id}/index.md` over HTTP.
///
/// Any non-success status counts as "not found"; only transport failures
/// surface as `Io`.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    client: Client,
    base: Url,
}

impl HttpContentStore {
    pub fn new(base_url: &str) -> Result<Self, ContentError> {
        let base =
            Url::parse(base_url).map_err(|e| ContentError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ContentError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn url_for(&self, id: &str, rel: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
            for segment in rel.split('/') {
                segments.push(segment);
            }
        }
        url
    }

    async fn get(&self, id: &str, rel: &str) -> Result<Response, ContentError> {
        let key = format!("{id}/{rel}");
        if !is_safe_segment(id) || !is_safe_relative(rel) {
            return Err(ContentError::NotFound(key));
        }
        let resp = self
            .client
            .get(self.url_for(id, rel))
            .send()
            .await
            .map_err(|e| ContentError::Io(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ContentError::NotFound(key));
        }
        Ok(resp)
    }
}

#[async_trait::async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch(&self, id: &str) -> Result<String, ContentError> {
        self.get(id, INDEX_FILE)
            .await
            .map_err(|e| match e {
                ContentError::NotFound(_) => ContentError::NotFound(id.to_string()),
                other => other,
            })?
            .text()
            .await
            .map_err(|e| ContentError::Io(e.to_string()))
    }

    async fn fetch_asset(&self, id: &str, rel: &str) -> Result<Vec<u8>, ContentError> {
        let bytes = self
            .get(id, rel)
            .await?
            .bytes()
            .await
            .map_err(|e| ContentError::Io(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_index_url_under_base_path() {
        let store = HttpContentStore::new("https://example.com/docs/").unwrap();
        assert_eq!(
            store.url_for("rust-nom", INDEX_FILE).as_str(),
            "https://example.com/docs/rust-nom/index.md"
        );
    }

    #[test]
    fn encodes_non_ascii_ids() {
        let store = HttpContentStore::new("https://example.com/docs").unwrap();
        let url = store.url_for("湖", INDEX_FILE);
        assert!(url.as_str().starts_with("https://example.com/docs/%E6%B9%96/"));
    }

    #[test]
    fn rejects_opaque_base_url() {
        assert!(matches!(
            HttpContentStore::new("mailto:someone@example.com"),
            Err(ContentError::InvalidBaseUrl(_))
        ));
    }
}
