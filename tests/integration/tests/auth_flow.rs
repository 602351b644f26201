//! Integration test: DID authentication between a relying party and a holder.

use chrono::{Duration, Utc};

use sovra_credentials::{AuthenticationChallenge, AuthenticationResponse, CredentialError};
use sovra_identity::Identity;

#[test]
fn test_challenge_response_over_the_wire() {
    let holder = Identity::generate();

    let challenge = AuthenticationChallenge::new("verifier.example", Duration::minutes(2));
    let wire = serde_json::to_vec(&challenge).unwrap();

    let received = AuthenticationChallenge::from_json(&wire).unwrap();
    let response = received.respond(holder.did(), holder.keypair()).unwrap();
    let wire = serde_json::to_vec(&response).unwrap();

    let response = AuthenticationResponse::from_json(&wire).unwrap();
    assert_eq!(response.challenge, challenge);
    assert!(response.verify(holder.did().uri(), Utc::now()).is_ok());
}

#[test]
fn test_response_rejected_after_expiry() {
    let holder = Identity::generate();
    let challenge = AuthenticationChallenge::new("verifier.example", Duration::seconds(1));
    let response = challenge.respond(holder.did(), holder.keypair()).unwrap();
    assert!(matches!(
        response.verify(holder.did().uri(), challenge.expires_at + Duration::seconds(1)),
        Err(CredentialError::ChallengeExpired(_))
    ));
}

#[test]
fn test_response_signed_by_another_key() {
    let holder = Identity::generate();
    let impostor = Identity::generate();
    let challenge = AuthenticationChallenge::new("verifier.example", Duration::minutes(2));
    // impostor claims the holder's DID
    let response = challenge.respond(holder.did(), impostor.keypair()).unwrap();
    assert!(matches!(
        response.verify(holder.did().uri(), Utc::now()),
        Err(CredentialError::InvalidSignature)
    ));
}
