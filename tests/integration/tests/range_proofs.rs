//! Integration test: range proofs carried inside credentials.

use serde_json::json;

use sovra_credentials::{Challenge, Credential, CredentialError, Proof};
use sovra_identity::Identity;
use sovra_integration_tests::subject;
use sovra_proof::{generate_range_proof, range_parameters, verify_range_proof, ProofError};

fn range_proof_of(credential: &Credential) -> sovra_proof::RangeProof {
    credential
        .proofs()
        .unwrap()
        .into_iter()
        .find_map(|p| match p {
            Proof::Range(r) => Some(r),
            _ => None,
        })
        .expect("credential carries a range proof")
}

#[test]
fn test_value_forms_accepted() {
    let issuer = Identity::generate();
    for value in [json!(42), json!(42.7), json!("42")] {
        let mut credential =
            Credential::new("c", issuer.did(), subject(json!({ "score": value })));
        credential.attach_proof(&Challenge::range("score", 40)).unwrap();
        let proof = range_proof_of(&credential);
        assert_eq!(proof.min, 40);
        assert!(verify_range_proof(&proof).is_ok());
    }
}

#[test]
fn test_proof_json_survives_credential_round_trip() {
    let issuer = Identity::generate();
    let mut credential = Credential::new("c", issuer.did(), subject(json!({"balance": u64::MAX})));
    credential.attach_proof(&Challenge::range("balance", 0)).unwrap();

    let bytes = credential.to_json_bytes().unwrap();
    let reloaded = Credential::from_json(&bytes).unwrap();
    let proof = range_proof_of(&reloaded);
    assert_eq!(proof.range, 1u128 << 64);
    assert!(verify_range_proof(&proof).is_ok());
}

#[test]
fn test_corrupted_proof_in_credential_fails_cleanly() {
    let issuer = Identity::generate();
    let mut credential = Credential::new("c", issuer.did(), subject(json!({"age": 70})));
    credential.attach_proof(&Challenge::range("age", 65)).unwrap();

    let bytes = credential.proof[0]["proof"]["bytes"].as_str().unwrap().to_string();
    credential.proof[0]["proof"]["bytes"] = json!("ff".repeat(bytes.len() / 2));
    let proof = range_proof_of(&credential);
    assert!(verify_range_proof(&proof).is_err());
}

#[test]
fn test_range_sizes_match_difference() {
    for (value, min, range) in [(18u64, 18u64, 2u128), (25, 18, 16), (300, 0, 65_536)] {
        let proof = generate_range_proof(value, min).unwrap();
        assert_eq!(proof.range, range);
        assert_eq!(range_parameters(value - min).range, range);
        assert!(verify_range_proof(&proof).is_ok());
    }
}

#[test]
fn test_below_minimum_surfaces_through_credentials() {
    let issuer = Identity::generate();
    let mut credential = Credential::new("c", issuer.did(), subject(json!({"age": "17"})));
    assert!(matches!(
        credential.attach_proof(&Challenge::parse_spec("range:age:18").unwrap()),
        Err(CredentialError::Proof(ProofError::BelowMinimum { value: 17, min: 18 }))
    ));
}
