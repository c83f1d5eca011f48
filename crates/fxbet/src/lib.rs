//! Facade crate for `ForexBet` features and shared modules.
//! Re-exports domain/kernel primitives and wires the feature slices to
//! their collaborators.
//! Keep this crate thin: it should compose other crates, not implement
//! business logic.
//!
//! ## Usage
//! - Load an [`domain::config::AppConfig`] (see `fxbet_kernel::config`).
//! - Call [`init`] to build a [`Platform`] with every slice connected.

pub use fxbet_domain as domain;
pub use fxbet_enrollment as enrollment;
pub use fxbet_identity as identity;
pub use fxbet_kernel as kernel;
pub use fxbet_logger as logger;
pub use fxbet_portfolio as portfolio;
pub use fxbet_storage as storage;

use fxbet_domain::config::AppConfig;
use std::sync::Arc;

/// Feature registry for runtime introspection.
pub mod features {
    /// Feature slices wired by [`crate::init`].
    pub const ENABLED: &[&str] = &["enrollment", "identity", "portfolio"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// The wired platform: every feature slice connected to its collaborators.
#[derive(Debug)]
pub struct Platform {
    pub auth: identity::AuthSession,
    pub users: identity::UserDirectory,
    pub enrollment: enrollment::SubmissionOrchestrator,
    pub lookup: enrollment::CepLookup,
    pub trading: portfolio::TradingClient,
    pub wallet: portfolio::WalletService,
}

/// Builds every feature slice from the configuration.
///
/// # Errors
/// Returns an error if any collaborator client cannot be constructed.
pub fn init(config: &AppConfig) -> Result<Platform, Box<dyn std::error::Error>> {
    let gateway = Arc::new(identity::RestIdentityGateway::new(&config.identity)?);
    let blobs =
        Arc::new(storage::HttpBlobStore::builder().base_url(config.blobs.base_url.as_str()).connect()?);

    let trading = portfolio::TradingClient::new(&config.api)?;

    Ok(Platform {
        auth: identity::AuthSession::new(gateway.clone()),
        users: identity::UserDirectory::new(gateway.clone()),
        enrollment: enrollment::SubmissionOrchestrator::new(blobs, gateway),
        lookup: enrollment::CepLookup::new(&config.lookup)?,
        wallet: portfolio::WalletService::new(trading.clone()),
        trading,
    })
}
