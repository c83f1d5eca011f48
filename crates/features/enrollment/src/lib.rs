//! # Enrollment
//!
//! This crate implements the multi-step registration flow: national-ID
//! validation, presentation masks, the in-progress draft with its document
//! attachments, the step gate sequencing the form pages, and the final
//! submission against the identity and blob-store collaborators.
//!
//! ## Architecture
//!
//! The flow is a pipeline of small pieces:
//!
//! 1. **Validation ([`cpf`], [`format`]):** pure functions over candidate
//!    field values. No I/O, total over arbitrary input.
//! 2. **State ([`draft`], [`steps`]):** the mutable [`draft::RegistrationDraft`]
//!    owned by the form session and the [`steps::StepGate`] controlling which
//!    page is active. A step advances only when every one of its field
//!    predicates passes.
//! 3. **Submission ([`submit`]):** fan-out upload of the three identity
//!    documents, account creation, and the profile-document write. The draft
//!    survives any failure untouched so the user can retry.
//!
//! External systems are consumed through the ports in
//! [`fxbet_kernel::ports`]; the only concrete client living here is the
//! postal-code lookup ([`lookup`]), which belongs to the address step.

pub mod cpf;
pub mod draft;
pub mod format;
pub mod lookup;
pub mod steps;
pub mod submit;

pub use crate::cpf::CpfError;
pub use crate::draft::{AttachmentSlot, DocumentKind, PreviewRegistry, RegistrationDraft};
pub use crate::lookup::CepLookup;
pub use crate::steps::{Field, FieldError, LookupNotice, Step, StepGate, ValidationError};
pub use crate::submit::{SubmissionOrchestrator, SubmitError, Submitted};
