//! Integration test: issuance, zero-knowledge attachment, presentation and
//! verification across sovra-identity, sovra-proof and sovra-credentials.

use serde_json::json;

use sovra_credentials::{
    build_presentation, verify_credential, verify_presentation, Challenge, Credential,
    CredentialError, CredentialStore, FileCredentialStore, Presentation, PresentationRequest,
    Proof,
};
use sovra_identity::{derive_did_key, resolve_did_key_public_key, Identity};
use sovra_integration_tests::{issue, subject, temp_dir};
use sovra_proof::ProofError;

// =========================================================================
// Identity
// =========================================================================

#[test]
fn test_did_key_round_trip() {
    let identity = Identity::generate();
    let public_key = identity.keypair().public_key();
    let did = derive_did_key(&public_key);
    assert_eq!(&did, identity.did());
    assert_eq!(resolve_did_key_public_key(did.uri()).unwrap(), public_key);
}

// =========================================================================
// End-to-end: range proof, signature, presentation
// =========================================================================

#[test]
fn test_end_to_end_range_proof_presentation() {
    let identity = Identity::generate();
    let vm = identity.verification_method_id();

    let mut c1 = Credential::new("C1", identity.did(), subject(json!({"age": 25})));
    c1.attach_proof(&Challenge::range("age", 18)).unwrap();
    c1.sign(identity.keypair(), &vm).unwrap();

    assert!(verify_credential(&c1).is_ok());
    assert!(!c1.credential_subject.contains_key("age"));

    let proofs = c1.proofs().unwrap();
    assert_eq!(proofs.len(), 2);
    match &proofs[0] {
        Proof::Range(range) => {
            assert_eq!(range.min, 18);
            assert!(sovra_proof::verify_range_proof(range).is_ok());
        }
        other => panic!("expected range proof first, got {:?}", other),
    }
    assert!(matches!(proofs[1], Proof::Signature(_)));

    let mut presentation = Presentation::new(vec![c1], identity.did());
    presentation.sign(identity.keypair(), &vm).unwrap();
    assert!(verify_presentation(&presentation).is_ok());

    // survives a trip through its persisted form
    let bytes = presentation.to_json_bytes().unwrap();
    let reloaded = Presentation::from_json(&bytes).unwrap();
    assert!(verify_presentation(&reloaded).is_ok());
}

#[test]
fn test_range_challenge_below_minimum_leaves_credential_unchanged() {
    let identity = Identity::generate();
    let mut credential = Credential::new("C1", identity.did(), subject(json!({"age": 25})));
    let before = credential.clone();

    let challenge =
        Challenge::from_json(br#"{"type":"range","params":{"field":"age","min":30}}"#).unwrap();
    let err = credential.attach_proof(&challenge).unwrap_err();
    assert!(matches!(
        err,
        CredentialError::Proof(ProofError::BelowMinimum { value: 25, min: 30 })
    ));
    assert_eq!(credential, before);
}

// =========================================================================
// Tampering
// =========================================================================

#[test]
fn test_tampered_subject_rejected() {
    let issuer = Identity::generate();
    let mut credential = issue(&issuer, "C1", json!({"name": "Ada", "age": 36}));
    credential
        .credential_subject
        .insert("name".into(), json!("Eve"));
    assert!(matches!(
        verify_credential(&credential),
        Err(CredentialError::InvalidSignature)
    ));
}

#[test]
fn test_disclosure_after_signing_breaks_issuer_signature() {
    let issuer = Identity::generate();
    let mut credential = issue(&issuer, "C1", json!({"age": 30, "email": "a@b.com"}));
    credential.reveal(&["email"]);
    assert_eq!(credential.credential_subject, subject(json!({"email": "a@b.com"})));
    assert!(matches!(
        verify_credential(&credential),
        Err(CredentialError::InvalidSignature)
    ));
}

#[test]
fn test_presentation_over_redacted_credential_reports_embedded_failure() {
    let issuer = Identity::generate();
    let holder = Identity::generate();
    let credential = issue(&issuer, "C1", json!({"age": 30, "email": "a@b.com"}));

    let request = PresentationRequest::new().challenge(Challenge::range("age", 18));
    let mut presentation = build_presentation(vec![credential], holder.did(), &request).unwrap();
    presentation
        .sign(holder.keypair(), &holder.verification_method_id())
        .unwrap();

    match verify_presentation(&presentation) {
        Err(CredentialError::EmbeddedCredential { id, source }) => {
            assert_eq!(id, "C1");
            // the range proof was appended after the issuer signature
            assert!(matches!(*source, CredentialError::MalformedProof(_)));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_presentation_with_untouched_credentials() {
    let issuer = Identity::generate();
    let holder = Identity::generate();
    let credentials = vec![
        issue(&issuer, "C1", json!({"degree": "BSc"})),
        issue(&issuer, "C2", json!({"employer": "ACME"})),
    ];

    let mut presentation =
        build_presentation(credentials, holder.did(), &PresentationRequest::new()).unwrap();
    presentation
        .sign(holder.keypair(), &holder.verification_method_id())
        .unwrap();
    assert!(verify_presentation(&presentation).is_ok());
}

// =========================================================================
// Storage
// =========================================================================

#[test]
fn test_stored_credential_still_verifies() {
    let dir = temp_dir("store");
    let store = FileCredentialStore::new(&dir);
    let issuer = Identity::generate();

    let mut credential = Credential::new("", issuer.did(), subject(json!({"age": 44})));
    credential.attach_proof(&Challenge::range("age", 21)).unwrap();
    credential
        .sign(issuer.keypair(), &issuer.verification_method_id())
        .unwrap();
    store.save(&credential).unwrap();

    let loaded = store.get(&credential.id).unwrap();
    assert_eq!(loaded, credential);
    assert!(verify_credential(&loaded).is_ok());
    assert_eq!(store.list_ids().unwrap(), vec![credential.id.clone()]);

    let _ = std::fs::remove_dir_all(&dir);
}
