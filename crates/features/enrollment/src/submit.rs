//! Final submission of a completed registration.
//!
//! Uploads the three identity documents concurrently, creates the account,
//! and writes the profile document. The join is all-or-nothing: the first
//! upload failure fails the submission and no account is created; the
//! sibling uploads keep running detached and their results are ignored.
//! Whatever fails, the draft stays untouched so the user can retry.

use crate::draft::{AttachmentSlot, DocumentKind, RegistrationDraft};
use crate::steps::{FieldError, Step, StepGate};
use chrono::Utc;
use fxbet_domain::DocumentSet;
use fxbet_kernel::ports::{BlobError, BlobStore, IdentityError, IdentityGateway};
use fxbet_kernel::text::strip_digits;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Why a submission was refused or failed.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("all three identity documents are required before submission")]
    MissingDocuments,

    #[error("submission is only available from the documents step")]
    NotAtFinalStep,

    #[error("registration draft is incomplete")]
    IncompleteDraft(Vec<FieldError>),

    #[error(transparent)]
    Upload(#[from] BlobError),

    #[error("document upload did not complete: {0}")]
    UploadInterrupted(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Signal to the caller after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    NavigateToLogin,
}

/// Drives the document uploads and the identity-collaborator writes for a
/// finished draft.
pub struct SubmissionOrchestrator {
    blobs: Arc<dyn BlobStore>,
    identity: Arc<dyn IdentityGateway>,
}

impl fmt::Debug for SubmissionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionOrchestrator").finish_non_exhaustive()
    }
}

impl SubmissionOrchestrator {
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>, identity: Arc<dyn IdentityGateway>) -> Self {
        Self { blobs, identity }
    }

    /// Whether the submit action is available: all three documents selected.
    #[must_use]
    pub fn ready(draft: &RegistrationDraft) -> bool {
        draft.documents_complete()
    }

    /// Submits the draft.
    ///
    /// On success the draft is cleared (releasing its previews) and the
    /// caller is told to navigate to the login surface. On any failure the
    /// draft and the gate are left exactly as they were.
    ///
    /// # Errors
    /// Refusals ([`SubmitError::MissingDocuments`],
    /// [`SubmitError::NotAtFinalStep`]) are no-ops; collaborator failures
    /// surface the underlying error verbatim.
    pub async fn submit(
        &self,
        gate: &StepGate,
        draft: &mut RegistrationDraft,
    ) -> Result<Submitted, SubmitError> {
        let (front, back, proof) = match (
            draft.attachment(DocumentKind::RgFront),
            draft.attachment(DocumentKind::RgBack),
            draft.attachment(DocumentKind::AddressProof),
        ) {
            (Some(front), Some(back), Some(proof)) => (front, back, proof),
            _ => return Err(SubmitError::MissingDocuments),
        };
        if gate.current() != Step::Documents {
            return Err(SubmitError::NotAtFinalStep);
        }

        // Refuse before touching any collaborator: nothing remote may
        // happen for a draft that cannot become a profile document.
        let seed = draft.profile_seed().map_err(SubmitError::IncompleteDraft)?;

        let cpf = strip_digits(&draft.cpf);
        let stamp = Utc::now().timestamp_millis();
        let uploads = (
            self.spawn_upload(front, DocumentKind::RgFront, &cpf, stamp),
            self.spawn_upload(back, DocumentKind::RgBack, &cpf, stamp),
            self.spawn_upload(proof, DocumentKind::AddressProof, &cpf, stamp),
        );

        let (rg_front, rg_back, address_proof) = match tokio::try_join!(
            finished(uploads.0),
            finished(uploads.1),
            finished(uploads.2),
        ) {
            Ok(urls) => urls,
            Err(error) => {
                warn!(error = %error, "Document upload failed, submission aborted");
                return Err(error);
            }
        };
        let documents = DocumentSet { rg_front, rg_back, address_proof };

        let credentials = draft.credentials();
        let uid = self.identity.create_account(&credentials).await?;
        let profile = seed.into_profile(uid.clone(), documents, Utc::now());
        self.identity.save_profile(&profile).await?;

        info!(uid, "Enrollment submitted");
        *draft = RegistrationDraft::default();
        Ok(Submitted::NavigateToLogin)
    }

    fn spawn_upload(
        &self,
        slot: &AttachmentSlot,
        kind: DocumentKind,
        cpf: &str,
        stamp: i64,
    ) -> JoinHandle<Result<String, BlobError>> {
        let path = format!("documents/{cpf}/{kind}/{stamp}_{}", slot.file_name());
        let bytes = slot.bytes().to_vec();
        let blobs = Arc::clone(&self.blobs);
        tokio::spawn(async move { blobs.store(bytes, &path).await })
    }
}

async fn finished(task: JoinHandle<Result<String, BlobError>>) -> Result<String, SubmitError> {
    match task.await {
        Ok(outcome) => outcome.map_err(SubmitError::from),
        Err(join) => Err(SubmitError::UploadInterrupted(join.to_string())),
    }
}
