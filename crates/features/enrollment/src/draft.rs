//! The in-progress registration record and its document attachments.
//!
//! A [`RegistrationDraft`] is owned exclusively by the active form session:
//! created empty, mutated field-by-field as the user types, discarded on
//! successful submission or navigation away. Attachment previews are issued
//! by a [`PreviewRegistry`] and released through RAII when a slot is
//! replaced or the draft is dropped.

use crate::steps::{Field, FieldError, ValidationError};
use crate::{cpf, format};
use chrono::{DateTime, NaiveDate, Utc};
use fxbet_domain::{DocumentSet, Gender, Nationality, UserProfile};
use fxbet_kernel::ports::Credentials;
use fxbet_kernel::text::strip_digits;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};
use strum_macros::{Display, EnumIter};

/// Issues preview references for selected attachments and tracks which are
/// still live. Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashSet<u64>,
}

impl PreviewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a preview reference for a freshly selected file.
    pub fn issue(&self, file_name: &str) -> PreviewHandle {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.live.insert(id);
        PreviewHandle {
            id,
            uri: format!("preview://{id}/{file_name}"),
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Number of previews that have been issued and not yet released.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }
}

/// A displayable reference to a selected file. Releases its registry entry
/// on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    uri: String,
    registry: Weak<Mutex<RegistryInner>>,
}

impl PreviewHandle {
    /// The displayable preview reference.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().live.remove(&self.id);
        }
    }
}

/// The three identity documents required before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    RgFront,
    RgBack,
    AddressProof,
}

/// A selected local file paired with its preview reference.
pub struct AttachmentSlot {
    file_name: String,
    bytes: Vec<u8>,
    preview: PreviewHandle,
}

impl AttachmentSlot {
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

impl fmt::Debug for AttachmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentSlot")
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .field("preview", &self.preview.uri)
            .finish()
    }
}

/// Password material kept out of debug output and out of the persisted
/// profile by construction.
#[derive(Clone, Default)]
struct SecretString(String);

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// All candidate field values composed across the form steps.
///
/// Masked fields store what was typed; canonical digit forms are produced
/// when the profile document is built. The password pair is request-only:
/// it is readable inside the crate for step-one validation and turned into
/// [`Credentials`] for account creation, but [`UserProfile`] has no fields
/// it could leak into.
#[derive(Debug, Default)]
pub struct RegistrationDraft {
    pub email: String,
    password: SecretString,
    password_confirmation: SecretString,
    pub name: String,
    pub cpf: String,
    pub rg: String,
    pub phone: String,
    pub birth_date: String,
    pub nationality: Option<Nationality>,
    pub gender: Option<Gender>,
    pub cep: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    rg_front: Option<AttachmentSlot>,
    rg_back: Option<AttachmentSlot>,
    address_proof: Option<AttachmentSlot>,
}

impl RegistrationDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = SecretString(password.into());
    }

    pub fn set_password_confirmation(&mut self, confirmation: impl Into<String>) {
        self.password_confirmation = SecretString(confirmation.into());
    }

    pub(crate) fn password(&self) -> &str {
        &self.password.0
    }

    pub(crate) fn password_confirmation(&self) -> &str {
        &self.password_confirmation.0
    }

    /// The account-creation credentials (email plus password).
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials { email: self.email.clone(), password: self.password.0.clone() }
    }

    /// Selects a file for one of the document slots, releasing any preview
    /// the slot held before.
    pub fn attach(
        &mut self,
        kind: DocumentKind,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        previews: &PreviewRegistry,
    ) {
        let file_name = file_name.into();
        let preview = previews.issue(&file_name);
        *self.slot_mut(kind) = Some(AttachmentSlot { file_name, bytes, preview });
    }

    /// Clears a document slot, releasing its preview.
    pub fn detach(&mut self, kind: DocumentKind) {
        *self.slot_mut(kind) = None;
    }

    #[must_use]
    pub fn attachment(&self, kind: DocumentKind) -> Option<&AttachmentSlot> {
        match kind {
            DocumentKind::RgFront => self.rg_front.as_ref(),
            DocumentKind::RgBack => self.rg_back.as_ref(),
            DocumentKind::AddressProof => self.address_proof.as_ref(),
        }
    }

    /// Whether all three document slots are filled.
    #[must_use]
    pub fn documents_complete(&self) -> bool {
        self.rg_front.is_some() && self.rg_back.is_some() && self.address_proof.is_some()
    }

    /// Extracts the typed values needed to build the profile document.
    ///
    /// # Errors
    /// Returns per-field errors for values that cannot be converted (an
    /// unparseable birth date, a missing selection). The step gate makes
    /// these unreachable in a normally driven session; the submission path
    /// still refuses to compose a record from a half-filled draft.
    pub fn profile_seed(&self) -> Result<ProfileSeed, Vec<FieldError>> {
        let mut errors = Vec::new();

        let birth_date = match format::parse_birth_date(&self.birth_date) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(Field::BirthDate, ValidationError::InvalidDate));
                None
            }
        };
        if let Err(reason) = cpf::validate(&self.cpf) {
            errors.push(FieldError::new(Field::Cpf, ValidationError::Cpf(reason)));
        }
        if self.nationality.is_none() {
            errors.push(FieldError::new(Field::Nationality, ValidationError::NotSelected));
        }
        if self.gender.is_none() {
            errors.push(FieldError::new(Field::Gender, ValidationError::NotSelected));
        }

        match (birth_date, self.nationality, self.gender) {
            (Some(birth_date), Some(nationality), Some(gender)) if errors.is_empty() => {
                Ok(ProfileSeed {
                    name: self.name.trim().to_owned(),
                    email: self.email.trim().to_owned(),
                    cpf: strip_digits(&self.cpf),
                    rg: strip_digits(&self.rg),
                    phone: strip_digits(&self.phone),
                    birth_date,
                    nationality,
                    gender,
                    cep: strip_digits(&self.cep),
                    street: self.street.trim().to_owned(),
                    number: self.number.trim().to_owned(),
                    complement: match self.complement.trim() {
                        "" => None,
                        complement => Some(complement.to_owned()),
                    },
                    district: self.district.trim().to_owned(),
                    city: self.city.trim().to_owned(),
                    state: self.state.trim().to_uppercase(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// The validated, canonical-form field values ready to become a profile
/// document. Contains no password material.
#[derive(Debug, Clone)]
pub struct ProfileSeed {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub rg: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub nationality: Nationality,
    pub gender: Gender,
    pub cep: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl ProfileSeed {
    /// Composes the final profile document for the identity collaborator.
    #[must_use]
    pub fn into_profile(
        self,
        uid: String,
        documents: DocumentSet,
        registered_at: DateTime<Utc>,
    ) -> UserProfile {
        UserProfile {
            id: None,
            uid,
            name: self.name,
            email: self.email,
            cpf: self.cpf,
            rg: self.rg,
            phone: self.phone,
            birth_date: self.birth_date,
            nationality: self.nationality,
            gender: self.gender,
            cep: self.cep,
            street: self.street,
            number: self.number,
            complement: self.complement,
            district: self.district,
            city: self.city,
            state: self.state,
            is_admin: false,
            registered_at,
            documents: Some(documents),
        }
    }
}

impl RegistrationDraft {
    fn slot_mut(&mut self, kind: DocumentKind) -> &mut Option<AttachmentSlot> {
        match kind {
            DocumentKind::RgFront => &mut self.rg_front,
            DocumentKind::RgBack => &mut self.rg_back,
            DocumentKind::AddressProof => &mut self.address_proof,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_an_attachment_releases_the_old_preview() {
        let previews = PreviewRegistry::new();
        let mut draft = RegistrationDraft::new();

        draft.attach(DocumentKind::RgFront, "front.jpg", vec![1], &previews);
        assert_eq!(previews.live_count(), 1);
        let first_uri = draft.attachment(DocumentKind::RgFront).map(|s| s.preview().uri().to_owned());

        draft.attach(DocumentKind::RgFront, "front-retake.jpg", vec![2], &previews);
        assert_eq!(previews.live_count(), 1);
        let second_uri = draft.attachment(DocumentKind::RgFront).map(|s| s.preview().uri().to_owned());
        assert_ne!(first_uri, second_uri);
    }

    #[test]
    fn dropping_the_draft_releases_every_preview() {
        let previews = PreviewRegistry::new();
        let mut draft = RegistrationDraft::new();
        draft.attach(DocumentKind::RgFront, "a.jpg", vec![1], &previews);
        draft.attach(DocumentKind::RgBack, "b.jpg", vec![2], &previews);
        draft.attach(DocumentKind::AddressProof, "c.pdf", vec![3], &previews);
        assert!(draft.documents_complete());
        assert_eq!(previews.live_count(), 3);

        drop(draft);
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn detaching_releases_and_empties_the_slot() {
        let previews = PreviewRegistry::new();
        let mut draft = RegistrationDraft::new();
        draft.attach(DocumentKind::AddressProof, "c.pdf", vec![3], &previews);
        draft.detach(DocumentKind::AddressProof);
        assert!(draft.attachment(DocumentKind::AddressProof).is_none());
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn debug_output_redacts_the_password_pair() {
        let mut draft = RegistrationDraft::new();
        draft.set_password("hunter22");
        draft.set_password_confirmation("hunter22");
        let rendered = format!("{draft:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn profile_seed_normalizes_masked_fields() {
        let mut draft = RegistrationDraft::new();
        draft.email = "maria@example.com".to_owned();
        draft.name = " Maria Souza ".to_owned();
        draft.cpf = "529.982.247-25".to_owned();
        draft.rg = "12.345.678-9".to_owned();
        draft.phone = "(11) 98765-4321".to_owned();
        draft.birth_date = "12/04/1990".to_owned();
        draft.nationality = Some(Nationality::Brazilian);
        draft.gender = Some(Gender::Female);
        draft.cep = "01001-000".to_owned();
        draft.street = "Praça da Sé".to_owned();
        draft.number = "100".to_owned();
        draft.district = "Sé".to_owned();
        draft.city = "São Paulo".to_owned();
        draft.state = "sp".to_owned();

        let seed = draft.profile_seed().unwrap();
        assert_eq!(seed.cpf, "52998224725");
        assert_eq!(seed.phone, "11987654321");
        assert_eq!(seed.cep, "01001000");
        assert_eq!(seed.state, "SP");
        assert_eq!(seed.complement, None);

        let profile = seed.into_profile(
            "u-1".to_owned(),
            DocumentSet {
                rg_front: "f".to_owned(),
                rg_back: "b".to_owned(),
                address_proof: "p".to_owned(),
            },
            Utc::now(),
        );
        assert_eq!(profile.name, "Maria Souza");
        assert!(!profile.is_admin);
    }

    #[test]
    fn profile_seed_reports_unconvertible_fields() {
        let mut draft = RegistrationDraft::new();
        draft.cpf = "529.982.247-25".to_owned();
        draft.birth_date = "31/02/1990".to_owned();
        draft.nationality = Some(Nationality::Brazilian);

        let errors = draft.profile_seed().unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&Field::BirthDate));
        assert!(fields.contains(&Field::Gender));
        assert!(!fields.contains(&Field::Nationality));
    }
}
