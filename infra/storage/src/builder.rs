use crate::HttpBlobStore;
use fxbet_kernel::ports::BlobError;
use private::Sealed;
use std::time::Duration;
use tracing::info;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
struct ClientConfig {
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS) }
    }
}

#[derive(Debug, Default)]
pub struct NoBase;
#[derive(Debug)]
pub struct WithBase(String);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoBase {}
impl Sealed for WithBase {}

/// Typestate builder for [`HttpBlobStore`]: the base URL must be supplied
/// before `connect` becomes available.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct HttpBlobStoreBuilder<S: Sealed = NoBase> {
    state: S,
    config: ClientConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> HttpBlobStoreBuilder<S> {
    /// Sets the per-request timeout.
    #[must_use = "Sets the request timeout for the blob-store client"]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> HttpBlobStoreBuilder<N> {
        HttpBlobStoreBuilder { state, config: self.config }
    }
}

impl HttpBlobStoreBuilder<NoBase> {
    #[must_use = "Creates a new blob-store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collaborator's base URL.
    #[must_use = "Sets the base URL for the blob-store collaborator"]
    pub fn base_url(self, url: impl Into<String>) -> HttpBlobStoreBuilder<WithBase> {
        self.transition(WithBase(url.into()))
    }
}

impl HttpBlobStoreBuilder<WithBase> {
    /// Consumes the configuration and builds the client.
    ///
    /// # Errors
    /// Returns [`BlobError::Upload`] if the underlying HTTP client cannot
    /// be constructed (an environment problem, e.g. no TLS backend).
    pub fn connect(self) -> Result<HttpBlobStore, BlobError> {
        let base_url = self.state.0.trim_end_matches('/').to_owned();

        let http = reqwest::Client::builder().timeout(self.config.timeout).build().map_err(
            |e| BlobError::Upload { path: base_url.clone(), message: e.to_string() },
        )?;

        info!(base_url = %base_url, "Blob-store client ready");

        Ok(HttpBlobStore { http, base_url })
    }
}
