//! Presentation formatting for form fields.
//!
//! Masks are presentation-only: the canonical stored value of a masked field
//! is always its raw digit string. Currency rendering follows the pt-BR
//! convention ("." for thousands, "," for decimals) and treats the typed
//! digits as a cents amount.

use chrono::NaiveDate;

/// Renders a keystroke sequence as a currency display string.
///
/// Non-digit characters are discarded, the remaining digits are read as
/// cents, and the amount is rendered with exactly two decimals:
/// `"12345"` becomes `"123,45"`, `"1234567"` becomes `"12.345,67"`.
/// Digitless input renders `"0,00"`.
#[must_use]
pub fn format_currency_input(raw: &str) -> String {
    let cents = raw
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u128, |acc, d| acc.saturating_mul(10).saturating_add(u128::from(d)));

    format!("{},{:02}", group_thousands(cents / 100), cents % 100)
}

/// Parses a currency display string back to its numeric amount.
///
/// Left inverse of [`format_currency_input`]: thousands separators are
/// stripped and the decimal comma becomes a decimal point. Input that does
/// not parse as a number yields `0.0`.
#[must_use]
pub fn parse_currency_display(display: &str) -> f64 {
    display.trim().replace('.', "").replace(',', ".").parse().unwrap_or(0.0)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// A fixed positional template over raw digits. `9` marks a digit slot,
/// anything else is a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask {
    template: &'static str,
}

/// National-ID mask, `XXX.XXX.XXX-XX`.
pub const CPF: Mask = Mask { template: "999.999.999-99" };
/// Secondary-ID (RG) mask, `XX.XXX.XXX-X`.
pub const RG: Mask = Mask { template: "99.999.999-9" };
/// Mobile phone mask, `(XX) XXXXX-XXXX`.
pub const PHONE: Mask = Mask { template: "(99) 99999-9999" };
/// Postal-code mask, `XXXXX-XXX`.
pub const POSTAL_CODE: Mask = Mask { template: "99999-999" };
/// Birth-date mask, `DD/MM/AAAA`.
pub const BIRTH_DATE: Mask = Mask { template: "99/99/9999" };

impl Mask {
    /// Renders partial input progressively: digits fill the `9` slots in
    /// order, literals appear as soon as a digit follows them, and surplus
    /// digits are dropped.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        let mut digits = input.chars().filter(char::is_ascii_digit);
        let mut rendered = String::with_capacity(self.template.len());
        let mut pending = String::new();

        for slot in self.template.chars() {
            if slot == '9' {
                let Some(digit) = digits.next() else { break };
                rendered.push_str(&pending);
                pending.clear();
                rendered.push(digit);
            } else {
                pending.push(slot);
            }
        }

        rendered
    }

    /// Whether `input` fills the template exactly: a digit in every `9`
    /// slot and every literal in place.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        input.chars().count() == self.template.chars().count()
            && self.template.chars().zip(input.chars()).all(|(slot, c)| {
                if slot == '9' { c.is_ascii_digit() } else { c == slot }
            })
    }

    /// Number of digit slots in the template.
    #[must_use]
    pub fn digit_count(&self) -> usize {
        self.template.chars().filter(|&c| c == '9').count()
    }
}

/// Parses a `DD/MM/AAAA` birth date, rejecting impossible calendar dates.
///
/// # Errors
/// Returns the underlying parse error for malformed or impossible dates.
pub fn parse_birth_date(input: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%d/%m/%Y")
}
