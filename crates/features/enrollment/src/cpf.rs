//! # National-ID Validation
//!
//! Validates a CPF (the Brazilian 11-digit taxpayer identifier) against its
//! two trailing check digits. The function is pure and total: any string is
//! accepted, malformed input is a rejection reason rather than a panic.
//!
//! ## Validation Logic
//! The checks run in a strict order:
//! 1. **Normalization**: every non-digit character is stripped, so the masked
//!    (`XXX.XXX.XXX-XX`) and raw forms validate identically.
//! 2. **Shape**: the normalized value must hold exactly 11 digits and must
//!    not be a degenerate all-equal sequence (`00000000000` and friends pass
//!    the checksum arithmetic but are not issued).
//! 3. **Check digits**: digit 10 is verified over the first nine digits with
//!    weights 10 down to 2, digit 11 over the first ten with weights 11 down
//!    to 2. In both rounds `11 - (sum % 11)` reduces to the expected digit,
//!    with results above 9 collapsing to 0.

/// Rejection reasons, ordered by the stage that produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CpfError {
    #[error("CPF is required")]
    Empty,

    #[error("CPF must contain 11 digits, found {len}")]
    WrongLength { len: usize },

    #[error("CPF is invalid: all digits are equal")]
    AllDigitsEqual,

    #[error("CPF is invalid: first check digit does not match")]
    FirstCheckDigit,

    #[error("CPF is invalid: second check digit does not match")]
    SecondCheckDigit,
}

/// Validates a CPF in masked or raw form.
///
/// # Errors
/// Returns the first failing [`CpfError`] stage; `Ok(())` means the value
/// carries two consistent check digits.
pub fn validate(input: &str) -> Result<(), CpfError> {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.is_empty() {
        return Err(CpfError::Empty);
    }
    if digits.len() != 11 {
        return Err(CpfError::WrongLength { len: digits.len() });
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return Err(CpfError::AllDigitsEqual);
    }

    if digits[9] != check_digit(&digits[..9], 10) {
        return Err(CpfError::FirstCheckDigit);
    }
    if digits[10] != check_digit(&digits[..10], 11) {
        return Err(CpfError::SecondCheckDigit);
    }

    Ok(())
}

/// Weighted mod-11 reduction shared by both check-digit rounds.
///
/// Weights run from `first_weight` down to 2 over `digits`; a reduced value
/// above 9 collapses to 0.
fn check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits.iter().zip((2..=first_weight).rev()).map(|(digit, weight)| digit * weight).sum();
    let rest = 11 - (sum % 11);
    if rest > 9 { 0 } else { rest }
}
