//! End-to-end registration flow against in-memory collaborator doubles.

use async_trait::async_trait;
use fxbet_domain::{Gender, Nationality, UserProfile};
use fxbet_enrollment::{
    DocumentKind, PreviewRegistry, RegistrationDraft, Step, StepGate, SubmissionOrchestrator,
    SubmitError, Submitted,
};
use fxbet_kernel::ports::{BlobError, BlobStore, Credentials, IdentityError, IdentityGateway, SignedIn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct RecordingBlobStore {
    fail_on: Option<&'static str>,
    uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn store(&self, _bytes: Vec<u8>, path: &str) -> Result<String, BlobError> {
        if let Some(marker) = self.fail_on {
            if path.contains(marker) {
                return Err(BlobError::Upload {
                    path: path.to_owned(),
                    message: "collaborator answered 507".to_owned(),
                });
            }
        }
        self.uploads.lock().push(path.to_owned());
        Ok(format!("https://cdn.example/{path}"))
    }
}

#[derive(Default)]
struct RecordingGateway {
    reject_account: bool,
    accounts_created: AtomicUsize,
    saved: Mutex<Vec<UserProfile>>,
}

#[async_trait]
impl IdentityGateway for RecordingGateway {
    async fn create_account(&self, credentials: &Credentials) -> Result<String, IdentityError> {
        if self.reject_account {
            return Err(IdentityError::Rejected {
                status: 409,
                message: "email already registered".to_owned(),
            });
        }
        self.accounts_created.fetch_add(1, Ordering::SeqCst);
        Ok(format!("uid-{}", credentials.email))
    }

    async fn sign_in(&self, _credentials: &Credentials) -> Result<SignedIn, IdentityError> {
        unimplemented!("not part of the enrollment flow")
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<String, IdentityError> {
        self.saved.lock().push(profile.clone());
        Ok("doc-1".to_owned())
    }

    async fn profile_by_uid(&self, _uid: &str) -> Result<Option<UserProfile>, IdentityError> {
        Ok(None)
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, IdentityError> {
        Ok(Vec::new())
    }
}

fn filled_draft(previews: &PreviewRegistry) -> (StepGate, RegistrationDraft) {
    let mut gate = StepGate::new();
    let mut draft = RegistrationDraft::new();

    draft.email = "maria@example.com".to_owned();
    draft.set_password("secret1");
    draft.set_password_confirmation("secret1");
    gate.next(&draft).unwrap();

    draft.name = "Maria Souza".to_owned();
    draft.cpf = "529.982.247-25".to_owned();
    draft.rg = "12.345.678-9".to_owned();
    draft.phone = "(11) 98765-4321".to_owned();
    draft.birth_date = "12/04/1990".to_owned();
    draft.nationality = Some(Nationality::Brazilian);
    draft.gender = Some(Gender::Female);
    gate.next(&draft).unwrap();

    draft.cep = "01001-000".to_owned();
    draft.street = "Praça da Sé".to_owned();
    draft.number = "100".to_owned();
    draft.district = "Centro".to_owned();
    draft.city = "São Paulo".to_owned();
    draft.state = "SP".to_owned();
    gate.next(&draft).unwrap();
    assert_eq!(gate.current(), Step::Documents);

    draft.attach(DocumentKind::RgFront, "front.jpg", vec![1], previews);
    draft.attach(DocumentKind::RgBack, "back.jpg", vec![2], previews);
    draft.attach(DocumentKind::AddressProof, "bill.pdf", vec![3], previews);

    (gate, draft)
}

#[tokio::test]
async fn successful_submission_uploads_creates_and_clears() {
    let previews = PreviewRegistry::new();
    let (gate, mut draft) = filled_draft(&previews);
    assert_eq!(previews.live_count(), 3);

    let blobs = Arc::new(RecordingBlobStore::default());
    let identity = Arc::new(RecordingGateway::default());
    let orchestrator = SubmissionOrchestrator::new(blobs.clone(), identity.clone());

    assert!(SubmissionOrchestrator::ready(&draft));
    let outcome = orchestrator.submit(&gate, &mut draft).await.unwrap();
    assert_eq!(outcome, Submitted::NavigateToLogin);

    let uploads = blobs.uploads.lock();
    assert_eq!(uploads.len(), 3);
    for kind in ["rg_front", "rg_back", "address_proof"] {
        assert!(
            uploads.iter().any(|p| p.starts_with("documents/52998224725/") && p.contains(kind)),
            "missing upload for {kind}"
        );
    }

    assert_eq!(identity.accounts_created.load(Ordering::SeqCst), 1);
    let saved = identity.saved.lock();
    assert_eq!(saved.len(), 1);
    let profile = &saved[0];
    assert_eq!(profile.uid, "uid-maria@example.com");
    assert_eq!(profile.cpf, "52998224725");
    let documents = profile.documents.as_ref().unwrap();
    assert!(documents.rg_front.contains("rg_front"));
    assert!(documents.address_proof.ends_with("bill.pdf"));

    // The persisted document carries no password material.
    let wire = serde_json::to_value(profile).unwrap();
    assert!(wire.get("senha").is_none());
    assert!(wire.get("confirmarSenha").is_none());

    // Success consumes the draft and releases every preview.
    assert!(draft.email.is_empty());
    assert!(!draft.documents_complete());
    assert_eq!(previews.live_count(), 0);
}

#[tokio::test]
async fn missing_attachment_makes_submit_a_no_op() {
    let previews = PreviewRegistry::new();
    let (gate, mut draft) = filled_draft(&previews);
    draft.detach(DocumentKind::AddressProof);
    assert!(!SubmissionOrchestrator::ready(&draft));

    let blobs = Arc::new(RecordingBlobStore::default());
    let identity = Arc::new(RecordingGateway::default());
    let orchestrator = SubmissionOrchestrator::new(blobs.clone(), identity.clone());

    let error = orchestrator.submit(&gate, &mut draft).await.unwrap_err();
    assert!(matches!(error, SubmitError::MissingDocuments));
    assert!(blobs.uploads.lock().is_empty());
    assert_eq!(identity.accounts_created.load(Ordering::SeqCst), 0);
    assert_eq!(draft.email, "maria@example.com");
}

#[tokio::test]
async fn failed_upload_prevents_account_creation_and_keeps_the_draft() {
    let previews = PreviewRegistry::new();
    let (gate, mut draft) = filled_draft(&previews);

    let blobs =
        Arc::new(RecordingBlobStore { fail_on: Some("rg_back"), ..RecordingBlobStore::default() });
    let identity = Arc::new(RecordingGateway::default());
    let orchestrator = SubmissionOrchestrator::new(blobs, identity.clone());

    let error = orchestrator.submit(&gate, &mut draft).await.unwrap_err();
    assert!(matches!(error, SubmitError::Upload(BlobError::Upload { .. })));
    assert_eq!(identity.accounts_created.load(Ordering::SeqCst), 0);
    assert!(identity.saved.lock().is_empty());

    // Fully recoverable: the draft and its attachments are untouched.
    assert!(draft.documents_complete());
    assert_eq!(draft.email, "maria@example.com");
    assert_eq!(previews.live_count(), 3);
}

#[tokio::test]
async fn collaborator_rejection_surfaces_and_keeps_the_draft() {
    let previews = PreviewRegistry::new();
    let (gate, mut draft) = filled_draft(&previews);

    let blobs = Arc::new(RecordingBlobStore::default());
    let identity =
        Arc::new(RecordingGateway { reject_account: true, ..RecordingGateway::default() });
    let orchestrator = SubmissionOrchestrator::new(blobs, identity.clone());

    let error = orchestrator.submit(&gate, &mut draft).await.unwrap_err();
    match error {
        SubmitError::Identity(IdentityError::Rejected { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "email already registered");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(identity.saved.lock().is_empty());
    assert!(draft.documents_complete());
}

#[tokio::test]
async fn submit_refuses_before_the_documents_step() {
    let previews = PreviewRegistry::new();
    let mut gate = StepGate::new();
    let mut draft = RegistrationDraft::new();
    draft.attach(DocumentKind::RgFront, "a.jpg", vec![1], &previews);
    draft.attach(DocumentKind::RgBack, "b.jpg", vec![2], &previews);
    draft.attach(DocumentKind::AddressProof, "c.pdf", vec![3], &previews);

    draft.email = "maria@example.com".to_owned();
    draft.set_password("secret1");
    draft.set_password_confirmation("secret1");
    gate.next(&draft).unwrap();

    let orchestrator = SubmissionOrchestrator::new(
        Arc::new(RecordingBlobStore::default()),
        Arc::new(RecordingGateway::default()),
    );
    let error = orchestrator.submit(&gate, &mut draft).await.unwrap_err();
    assert!(matches!(error, SubmitError::NotAtFinalStep));
}
