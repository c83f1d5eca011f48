use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Top-level application configuration shared across features.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub api: TradingApiConfig,
    pub identity: IdentityConfig,
    pub blobs: BlobStoreConfig,
    pub lookup: LookupConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Trading/portfolio REST collaborator endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TradingApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Identity collaborator (accounts + profile documents).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Blob-store collaborator for document uploads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlobStoreConfig {
    pub base_url: String,
}

/// Postal-code lookup collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
}

// --- Default ---

impl Default for TradingApiConfig {
    fn default() -> Self {
        Self { base_url: "http://45.166.15.28:8093/api".to_owned(), timeout_seconds: 30 }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9099".to_owned(),
            api_key: "dev-only-change-me".to_owned(),
        }
    }
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:9199".to_owned() }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { base_url: "https://viacep.com.br".to_owned() }
    }
}
