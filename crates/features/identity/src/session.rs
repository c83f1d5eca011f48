//! Ambient authentication state with explicit lifecycle.
//!
//! The session is initialized in a loading state, resolved on the first
//! sign-in (or an explicit signed-out resolution), and torn down on
//! sign-out. Components that care observe it through a watch channel
//! instead of reaching for a global.

use fxbet_kernel::ports::{Credentials, IdentityError, IdentityGateway};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Snapshot of the ambient auth state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub identity: Option<Identity>,
    pub is_admin: bool,
    /// True until the first resolution (a sign-in or an explicit
    /// signed-out resolution) completes.
    pub loading: bool,
}

/// The auth context shared with components that need the current identity.
pub struct AuthSession {
    gateway: Arc<dyn IdentityGateway>,
    state: watch::Sender<AuthState>,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession").field("state", &*self.state.borrow()).finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Creates the session in its loading state.
    #[must_use]
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        let (state, _) =
            watch::channel(AuthState { identity: None, is_admin: false, loading: true });
        Self { gateway, state }
    }

    /// Subscribes to auth-state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Marks the initial resolution as complete with nobody signed in.
    pub fn resolve_signed_out(&self) {
        self.state.send_replace(AuthState { identity: None, is_admin: false, loading: false });
    }

    /// Signs in and resolves the admin flag from the profile document.
    ///
    /// A sign-in whose profile could not be resolved still succeeds; the
    /// admin flag simply stays off. A failed sign-in leaves the session
    /// state exactly as it was.
    ///
    /// # Errors
    /// Propagates the gateway error verbatim.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthState, IdentityError> {
        let credentials =
            Credentials { email: email.to_owned(), password: password.to_owned() };
        let signed = self.gateway.sign_in(&credentials).await.inspect_err(|error| {
            warn!(email, error = %error, "Sign-in failed");
        })?;

        let is_admin = signed.profile.as_ref().is_some_and(|profile| profile.is_admin);
        let state = AuthState {
            identity: Some(Identity { uid: signed.uid, email: signed.email }),
            is_admin,
            loading: false,
        };
        info!(is_admin, "Signed in");
        self.state.send_replace(state.clone());
        Ok(state)
    }

    /// Clears the session back to the signed-out state.
    pub fn sign_out(&self) {
        info!("Signed out");
        self.resolve_signed_out();
    }
}
