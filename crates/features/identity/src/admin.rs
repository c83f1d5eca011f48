//! Admin user-management surface.
//!
//! Lists every registered profile for the management table and renders
//! national IDs concealed until explicitly revealed. The caller gates
//! access on [`crate::AuthState::is_admin`]; listing itself is a plain
//! collaborator read.

use fxbet_domain::UserProfile;
use fxbet_kernel::ports::{IdentityError, IdentityGateway};
use fxbet_kernel::text::{conceal_digits, strip_digits};
use std::fmt;
use std::sync::Arc;

/// Placeholder shown when a profile carries no national ID at all.
pub const CONCEALED_CPF: &str = "***.***.***-**";

/// Read-only directory over the registered profiles.
pub struct UserDirectory {
    gateway: Arc<dyn IdentityGateway>,
}

impl fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDirectory").finish_non_exhaustive()
    }
}

impl UserDirectory {
    #[must_use]
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self { gateway }
    }

    /// Every stored profile document, for the management table.
    ///
    /// # Errors
    /// Propagates the gateway error verbatim.
    pub async fn list(&self) -> Result<Vec<UserProfile>, IdentityError> {
        self.gateway.list_profiles().await
    }
}

/// Renders a national ID for the listing's show/hide toggle.
///
/// Concealment replaces every digit with `*` while keeping the mask
/// punctuation; an absent or digitless value renders the fixed
/// placeholder regardless of the toggle.
#[must_use]
pub fn cpf_display(cpf: Option<&str>, revealed: bool) -> String {
    let Some(value) = cpf else {
        return CONCEALED_CPF.to_owned();
    };
    let digits = strip_digits(value);
    if digits.is_empty() {
        return CONCEALED_CPF.to_owned();
    }

    let grouped = if digits.len() == 11 {
        format!("{}.{}.{}-{}", &digits[0..3], &digits[3..6], &digits[6..9], &digits[9..11])
    } else {
        value.to_owned()
    };

    if revealed { grouped } else { conceal_digits(&grouped) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concealed_ids_keep_their_shape() {
        assert_eq!(cpf_display(Some("52998224725"), false), "***.***.***-**");
        assert_eq!(cpf_display(Some("529.982.247-25"), false), "***.***.***-**");
    }

    #[test]
    fn revealed_ids_render_masked() {
        assert_eq!(cpf_display(Some("52998224725"), true), "529.982.247-25");
        assert_eq!(cpf_display(Some("529.982.247-25"), true), "529.982.247-25");
    }

    #[test]
    fn absent_ids_always_show_the_placeholder() {
        assert_eq!(cpf_display(None, true), CONCEALED_CPF);
        assert_eq!(cpf_display(Some(""), false), CONCEALED_CPF);
        assert_eq!(cpf_display(Some("---"), true), CONCEALED_CPF);
    }

    #[test]
    fn unexpected_lengths_are_rendered_as_stored() {
        assert_eq!(cpf_display(Some("12345"), true), "12345");
        assert_eq!(cpf_display(Some("12345"), false), "*****");
    }
}
