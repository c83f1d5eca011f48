//! Narrow interfaces for the external collaborators.
//!
//! Feature slices consume these traits so the concrete backends stay
//! swappable; the HTTP implementations live in their own crates.

use async_trait::async_trait;
use fxbet_domain::UserProfile;
use std::fmt;

/// Account credentials. Request-only: these never reach a persisted
/// document, and the password is redacted from debug output.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

/// Result of a successful sign-in: the account plus its profile document,
/// when one exists.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub uid: String,
    pub email: String,
    pub profile: Option<UserProfile>,
}

/// Errors from the identity collaborator.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity collaborator unreachable: {0}")]
    Network(String),
    #[error("identity collaborator rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("identity collaborator returned a malformed response: {0}")]
    Malformed(String),
}

/// Account and profile-document operations.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Creates an account and returns its uid.
    async fn create_account(&self, credentials: &Credentials) -> Result<String, IdentityError>;

    /// Signs in and resolves the account's profile document.
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignedIn, IdentityError>;

    /// Stores a profile document, returning its document id.
    async fn save_profile(&self, profile: &UserProfile) -> Result<String, IdentityError>;

    /// Fetches the profile document for an account, if any.
    async fn profile_by_uid(&self, uid: &str) -> Result<Option<UserProfile>, IdentityError>;

    /// Lists every stored profile document.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, IdentityError>;
}

/// Errors from the blob-store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob upload failed for {path}: {message}")]
    Upload { path: String, message: String },
}

/// Binary attachment storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `path` and returns a retrievable URL.
    async fn store(&self, bytes: Vec<u8>, path: &str) -> Result<String, BlobError>;
}

/// Street-level address resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub street: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

/// Errors from the postal-code lookup collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("postal code not found")]
    NotFound,
    #[error("postal-code lookup unreachable: {0}")]
    Network(String),
    #[error("postal-code lookup returned a malformed response: {0}")]
    Malformed(String),
}

/// Postal-code to address resolution.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn resolve(&self, postal_code: &str) -> Result<ResolvedAddress, LookupError>;
}
