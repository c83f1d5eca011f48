//! # Blob Store Client
//!
//! HTTP client for the external blob-store collaborator. Uploads a binary
//! payload under a caller-chosen path and hands back a retrievable URL.
//!
//! ## Example
//! ```rust,no_run
//! use fxbet_storage::HttpBlobStore;
//! use fxbet_kernel::ports::BlobStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let blobs = HttpBlobStore::builder().base_url("http://localhost:9199").connect()?;
//! let url = blobs.store(vec![0xFF, 0xD8], "documents/52998224725/rg_front/photo.jpg").await?;
//! # Ok(())
//! # }
//! ```

mod builder;

pub use crate::builder::{HttpBlobStoreBuilder, NoBase, WithBase};

use async_trait::async_trait;
use fxbet_kernel::ports::{BlobError, BlobStore};
use serde::Deserialize;
use tracing::{debug, warn};

/// Client for the blob-store collaborator.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
}

/// Upload acknowledgement body. The collaborator may answer with the
/// canonical URL of the stored object; when it does not, the URL is derived
/// from the upload path.
#[derive(Debug, Deserialize)]
struct StoredBlob {
    url: String,
}

impl HttpBlobStore {
    /// Returns a new [`HttpBlobStoreBuilder`] to configure the client.
    #[must_use]
    pub fn builder() -> HttpBlobStoreBuilder<NoBase> {
        HttpBlobStoreBuilder::new()
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn store(&self, bytes: Vec<u8>, path: &str) -> Result<String, BlobError> {
        let target = self.object_url(path);
        debug!(path, size = bytes.len(), "Uploading blob");

        let response = self
            .http
            .post(&target)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| BlobError::Upload { path: path.to_owned(), message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Blob upload rejected");
            return Err(BlobError::Upload {
                path: path.to_owned(),
                message: format!("collaborator answered {status}"),
            });
        }

        // Prefer the collaborator-assigned URL, fall back to the upload path.
        match response.json::<StoredBlob>().await {
            Ok(stored) => Ok(stored.url),
            Err(_) => Ok(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn store_returns_collaborator_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents/123/rg_front/a.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "url": "https://cdn.example/a.jpg" })),
            )
            .mount(&server)
            .await;

        let blobs = HttpBlobStore::builder().base_url(server.uri()).connect().unwrap();
        let url = blobs.store(vec![1, 2, 3], "documents/123/rg_front/a.jpg").await.unwrap();
        assert_eq!(url, "https://cdn.example/a.jpg");
    }

    #[tokio::test]
    async fn store_derives_url_when_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let blobs = HttpBlobStore::builder().base_url(server.uri()).connect().unwrap();
        let url = blobs.store(vec![1], "documents/123/rg_back/b.jpg").await.unwrap();
        assert_eq!(url, format!("{}/documents/123/rg_back/b.jpg", server.uri()));
    }

    #[tokio::test]
    async fn store_surfaces_rejections() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(507))
            .mount(&server)
            .await;

        let blobs = HttpBlobStore::builder().base_url(server.uri()).connect().unwrap();
        let err = blobs.store(vec![1], "documents/123/proof/c.jpg").await.unwrap_err();
        let BlobError::Upload { path, message } = err;
        assert_eq!(path, "documents/123/proof/c.jpg");
        assert!(message.contains("507"));
    }
}
