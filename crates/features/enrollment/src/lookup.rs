//! HTTP client for the postal-code lookup collaborator.
//!
//! Resolves an 8-digit CEP to its street-level address via the
//! `/ws/{code}/json/` endpoint. A body carrying `"erro": true` means the
//! code does not exist.

use async_trait::async_trait;
use fxbet_domain::config::LookupConfig;
use fxbet_kernel::ports::{AddressLookup, LookupError, ResolvedAddress};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const LOOKUP_TIMEOUT_SECONDS: u64 = 10;

/// Client for the postal-code lookup collaborator.
#[derive(Debug, Clone)]
pub struct CepLookup {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CepPayload {
    #[serde(default)]
    erro: bool,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

impl CepLookup {
    /// Builds the client from the lookup section of the configuration.
    ///
    /// # Errors
    /// Returns [`LookupError::Network`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }
}

#[async_trait]
impl AddressLookup for CepLookup {
    async fn resolve(&self, postal_code: &str) -> Result<ResolvedAddress, LookupError> {
        let url = format!("{}/ws/{postal_code}/json/", self.base_url);
        debug!(postal_code, "Resolving postal code");

        let response =
            self.http.get(&url).send().await.map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Network(format!("lookup answered {status}")));
        }

        let payload: CepPayload =
            response.json().await.map_err(|e| LookupError::Malformed(e.to_string()))?;

        if payload.erro {
            return Err(LookupError::NotFound);
        }

        Ok(ResolvedAddress {
            street: payload.logradouro,
            district: payload.bairro,
            city: payload.localidade,
            state: payload.uf,
        })
    }
}
