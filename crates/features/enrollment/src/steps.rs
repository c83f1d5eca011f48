//! The finite-state controller sequencing the four form pages.
//!
//! Steps are data: each [`Step`] carries its own validation routine over
//! the draft, and the [`StepGate`] only advances when every predicate of
//! the active step passes. Going back never validates.

use crate::draft::RegistrationDraft;
use crate::{cpf, format};
use fxbet_kernel::ports::{AddressLookup, LookupError, ResolvedAddress};
use fxbet_kernel::text::strip_digits;
use strum_macros::{Display, EnumIter};
use tracing::{debug, warn};

const MIN_PASSWORD_CHARS: usize = 6;
const MIN_TEXT_CHARS: usize = 3;

/// Form pages in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter)]
pub enum Step {
    Credentials,
    Personal,
    Address,
    Documents,
}

impl Step {
    /// One-based position for the progress indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Credentials => 1,
            Self::Personal => 2,
            Self::Address => 3,
            Self::Documents => 4,
        }
    }

    const fn following(self) -> Option<Self> {
        match self {
            Self::Credentials => Some(Self::Personal),
            Self::Personal => Some(Self::Address),
            Self::Address => Some(Self::Documents),
            Self::Documents => None,
        }
    }

    const fn preceding(self) -> Option<Self> {
        match self {
            Self::Credentials => None,
            Self::Personal => Some(Self::Credentials),
            Self::Address => Some(Self::Personal),
            Self::Documents => Some(Self::Address),
        }
    }

    /// Runs this step's field predicates over the draft.
    #[must_use]
    pub fn validate(self, draft: &RegistrationDraft) -> Vec<FieldError> {
        match self {
            Self::Credentials => validate_credentials(draft),
            Self::Personal => validate_personal(draft),
            Self::Address => validate_address(draft),
            // The submission gate owns the attachment requirement.
            Self::Documents => Vec::new(),
        }
    }
}

/// Form fields addressable by validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Email,
    Password,
    PasswordConfirmation,
    Name,
    Cpf,
    Rg,
    Phone,
    BirthDate,
    Nationality,
    Gender,
    PostalCode,
    Street,
    Number,
    District,
    City,
    State,
}

/// Field-level rejection reasons. Always local and synchronous; the user
/// stays on the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("email address is not well-formed")]
    InvalidEmail,

    #[error("must have at least {min} characters")]
    TooShort { min: usize },

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Cpf(#[from] cpf::CpfError),

    #[error("does not match the expected format")]
    MaskMismatch,

    #[error("not a valid date")]
    InvalidDate,

    #[error("a selection is required")]
    NotSelected,

    #[error("must not be empty")]
    Required,

    #[error("must be a two-letter state code")]
    InvalidStateCode,
}

/// A validation failure attributed to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub reason: ValidationError,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: Field, reason: ValidationError) -> Self {
        Self { field, reason }
    }
}

/// Recoverable notice from a failed postal-code lookup. The address step is
/// never blocked by it; the fields simply stay as they were.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupNotice {
    #[error("postal code not found")]
    NotFound,

    #[error("postal-code lookup unavailable: {0}")]
    Unavailable(String),
}

/// Claim on an in-flight postal-code lookup. A response is only applied
/// while its ticket is still the newest one issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    digits: String,
}

impl LookupTicket {
    /// The 8-digit code this lookup resolves.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

/// Sequencer for the registration pages.
#[derive(Debug)]
pub struct StepGate {
    current: Step,
    furthest_passed: Option<Step>,
    lookup_generation: u64,
}

impl Default for StepGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StepGate {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: Step::Credentials, furthest_passed: None, lookup_generation: 0 }
    }

    /// The active page.
    #[must_use]
    pub const fn current(&self) -> Step {
        self.current
    }

    /// Whether `step`'s predicates have passed at least once, for the
    /// progress indicator.
    #[must_use]
    pub fn is_complete(&self, step: Step) -> bool {
        self.furthest_passed.is_some_and(|furthest| furthest >= step)
    }

    /// Attempts to advance past the active step.
    ///
    /// # Errors
    /// Returns every failing field predicate of the active step; the gate
    /// stays where it was.
    pub fn next(&mut self, draft: &RegistrationDraft) -> Result<Step, Vec<FieldError>> {
        let errors = self.current.validate(draft);
        if !errors.is_empty() {
            debug!(step = %self.current, failures = errors.len(), "Step validation failed");
            return Err(errors);
        }

        self.furthest_passed =
            Some(self.furthest_passed.map_or(self.current, |furthest| furthest.max(self.current)));
        if let Some(following) = self.current.following() {
            self.current = following;
        }
        Ok(self.current)
    }

    /// Steps back one page without validating, floored at the first page.
    pub fn back(&mut self) -> Step {
        if let Some(preceding) = self.current.preceding() {
            self.current = preceding;
        }
        self.current
    }

    /// Starts a postal-code lookup if the field holds exactly the
    /// template's digit count. Any previously issued ticket becomes stale.
    pub fn begin_postal_lookup(&mut self, draft: &RegistrationDraft) -> Option<LookupTicket> {
        let digits = strip_digits(&draft.cep);
        if digits.len() != format::POSTAL_CODE.digit_count() {
            return None;
        }
        self.lookup_generation += 1;
        Some(LookupTicket { generation: self.lookup_generation, digits })
    }

    /// Applies a lookup outcome. Stale tickets are discarded without
    /// touching the draft; failures surface a recoverable notice.
    ///
    /// Returns whether the address fields were filled.
    ///
    /// # Errors
    /// Returns a [`LookupNotice`] when the current lookup failed; the
    /// address fields stay as they were.
    pub fn apply_postal_lookup(
        &self,
        ticket: &LookupTicket,
        draft: &mut RegistrationDraft,
        outcome: Result<ResolvedAddress, LookupError>,
    ) -> Result<bool, LookupNotice> {
        if ticket.generation != self.lookup_generation {
            debug!(code = %ticket.digits, "Discarding superseded postal lookup");
            return Ok(false);
        }

        match outcome {
            Ok(address) => {
                draft.street = address.street;
                draft.district = address.district;
                draft.city = address.city;
                draft.state = address.state;
                Ok(true)
            }
            Err(LookupError::NotFound) => Err(LookupNotice::NotFound),
            Err(error) => {
                warn!(error = %error, "Postal-code lookup failed");
                Err(LookupNotice::Unavailable(error.to_string()))
            }
        }
    }

    /// Blur handler for the postal-code field: begins a lookup when the
    /// code is complete, resolves it, and auto-fills the address fields.
    ///
    /// Returns whether the fields were filled.
    ///
    /// # Errors
    /// Returns a [`LookupNotice`] when the lookup failed.
    pub async fn postal_code_blurred<L>(
        &mut self,
        draft: &mut RegistrationDraft,
        lookup: &L,
    ) -> Result<bool, LookupNotice>
    where
        L: AddressLookup + ?Sized,
    {
        let Some(ticket) = self.begin_postal_lookup(draft) else {
            return Ok(false);
        };
        let outcome = lookup.resolve(ticket.digits()).await;
        self.apply_postal_lookup(&ticket, draft, outcome)
    }
}

fn validate_credentials(draft: &RegistrationDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !email_is_well_formed(&draft.email) {
        errors.push(FieldError::new(Field::Email, ValidationError::InvalidEmail));
    }
    if draft.password().chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new(
            Field::Password,
            ValidationError::TooShort { min: MIN_PASSWORD_CHARS },
        ));
    }
    // A mismatch is reported against the confirmation field only.
    if draft.password() != draft.password_confirmation() {
        errors.push(FieldError::new(Field::PasswordConfirmation, ValidationError::PasswordMismatch));
    }

    errors
}

fn validate_personal(draft: &RegistrationDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.name.trim().chars().count() < MIN_TEXT_CHARS {
        errors.push(FieldError::new(Field::Name, ValidationError::TooShort { min: MIN_TEXT_CHARS }));
    }
    if let Err(reason) = cpf::validate(&draft.cpf) {
        errors.push(FieldError::new(Field::Cpf, ValidationError::Cpf(reason)));
    }
    if !field_fills_mask(&draft.rg, format::RG) {
        errors.push(FieldError::new(Field::Rg, ValidationError::MaskMismatch));
    }
    if !field_fills_mask(&draft.phone, format::PHONE) {
        errors.push(FieldError::new(Field::Phone, ValidationError::MaskMismatch));
    }
    if format::parse_birth_date(&draft.birth_date).is_err() {
        errors.push(FieldError::new(Field::BirthDate, ValidationError::InvalidDate));
    }
    if draft.nationality.is_none() {
        errors.push(FieldError::new(Field::Nationality, ValidationError::NotSelected));
    }
    if draft.gender.is_none() {
        errors.push(FieldError::new(Field::Gender, ValidationError::NotSelected));
    }

    errors
}

fn validate_address(draft: &RegistrationDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !field_fills_mask(&draft.cep, format::POSTAL_CODE) {
        errors.push(FieldError::new(Field::PostalCode, ValidationError::MaskMismatch));
    }
    for (field, value) in [
        (Field::Street, &draft.street),
        (Field::District, &draft.district),
        (Field::City, &draft.city),
    ] {
        if value.trim().chars().count() < MIN_TEXT_CHARS {
            errors.push(FieldError::new(field, ValidationError::TooShort { min: MIN_TEXT_CHARS }));
        }
    }
    if draft.number.trim().is_empty() {
        errors.push(FieldError::new(Field::Number, ValidationError::Required));
    }
    let state = draft.state.trim();
    if state.chars().count() != 2 || !state.chars().all(char::is_alphabetic) {
        errors.push(FieldError::new(Field::State, ValidationError::InvalidStateCode));
    }

    errors
}

/// The typed value fills the mask once its digits are re-rendered, so both
/// the masked and the raw digit form are accepted.
fn field_fills_mask(value: &str, mask: format::Mask) -> bool {
    mask.matches(&mask.apply(value))
}

fn email_is_well_formed(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
}
