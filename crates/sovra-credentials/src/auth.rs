use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use sovra_core::Did;
use sovra_crypto::KeyPair;
use sovra_identity::{DidKeyResolver, DidResolver};

use crate::error::CredentialError;
use crate::proof::{SignatureProof, AUTHENTICATION};

/// Type tag of an authentication challenge.
pub const AUTHENTICATION_CHALLENGE_TYPE: &str = "AuthenticationChallenge";

const NONCE_LENGTH: usize = 16;

/// A nonce a relying party asks a DID holder to sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationChallenge {
    #[serde(rename = "type")]
    pub challenge_type: String,
    /// Base58 of 16 random bytes.
    pub challenge: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A challenge together with the holder's signature over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    pub challenge: AuthenticationChallenge,
    pub proof: SignatureProof,
}

impl AuthenticationChallenge {
    /// Fresh challenge for `domain`, valid for `validity` from now.
    pub fn new(domain: impl Into<String>, validity: Duration) -> Self {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);
        let issued_at = Utc::now().trunc_subsecs(0);
        Self {
            challenge_type: AUTHENTICATION_CHALLENGE_TYPE.to_string(),
            challenge: bs58::encode(nonce).into_string(),
            domain: domain.into(),
            issued_at,
            expires_at: issued_at + validity,
        }
    }

    /// Parse a challenge document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(|e| CredentialError::InvalidJson(e.to_string()))
    }

    /// Whether the challenge has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Bytes covered by the response signature: compact JSON of the challenge.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Sign the challenge as `did`, using its primary verification method.
    pub fn respond(
        &self,
        did: &Did,
        keypair: &KeyPair,
    ) -> Result<AuthenticationResponse, CredentialError> {
        let signature = sovra_crypto::sign(&self.signing_bytes()?, keypair);
        let proof = SignatureProof::new(AUTHENTICATION, &did.verification_method_id(), &signature);
        tracing::info!(did = %did, domain = %self.domain, "authentication challenge answered");
        Ok(AuthenticationResponse {
            challenge: self.clone(),
            proof,
        })
    }
}

impl AuthenticationResponse {
    /// Parse a response document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(|e| CredentialError::InvalidJson(e.to_string()))
    }

    /// Check that `did` signed this challenge and that it was still valid
    /// at `now`.
    pub fn verify(&self, did: &str, now: DateTime<Utc>) -> Result<(), CredentialError> {
        self.verify_with(&DidKeyResolver, did, now)
    }

    /// Like [`verify`](Self::verify) with a custom resolver.
    pub fn verify_with<R: DidResolver>(
        &self,
        resolver: &R,
        did: &str,
        now: DateTime<Utc>,
    ) -> Result<(), CredentialError> {
        if self.challenge.is_expired(now) {
            return Err(CredentialError::ChallengeExpired(
                self.challenge.expires_at.to_rfc3339(),
            ));
        }
        if self.proof.proof_purpose != AUTHENTICATION {
            return Err(CredentialError::MalformedProof(format!(
                "unexpected proof purpose '{}'",
                self.proof.proof_purpose
            )));
        }
        let signer = self
            .proof
            .verification_method
            .split('#')
            .next()
            .unwrap_or_default();
        if signer != did {
            return Err(CredentialError::MalformedProof(format!(
                "verification method {} does not belong to {}",
                self.proof.verification_method, did
            )));
        }

        let signature = self.proof.signature()?;
        let public_key = resolver.resolve_public_key(did)?;
        sovra_crypto::verify(&self.challenge.signing_bytes()?, &signature, &public_key)
            .map_err(|_| CredentialError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sovra_identity::Identity;

    #[test]
    fn test_new_challenge() {
        let ch = AuthenticationChallenge::new("example.com", Duration::minutes(5));
        assert_eq!(ch.challenge_type, "AuthenticationChallenge");
        assert_eq!(bs58::decode(&ch.challenge).into_vec().unwrap().len(), 16);
        assert_eq!(ch.expires_at - ch.issued_at, Duration::minutes(5));
        let other = AuthenticationChallenge::new("example.com", Duration::minutes(5));
        assert_ne!(ch.challenge, other.challenge);
    }

    #[test]
    fn test_domain_omitted_when_empty() {
        let ch = AuthenticationChallenge::new("", Duration::minutes(1));
        let value = serde_json::to_value(&ch).unwrap();
        assert!(value.get("domain").is_none());
        assert!(value.get("issuedAt").is_some());
    }

    #[test]
    fn test_respond_and_verify() {
        let holder = Identity::generate();
        let ch = AuthenticationChallenge::new("example.com", Duration::minutes(5));
        let response = ch.respond(holder.did(), holder.keypair()).unwrap();
        assert_eq!(
            response.proof.verification_method,
            format!("{}#keys-1", holder.did())
        );

        let bytes = serde_json::to_vec(&response).unwrap();
        let parsed = AuthenticationResponse::from_json(&bytes).unwrap();
        assert!(parsed.verify(holder.did().uri(), Utc::now()).is_ok());
    }

    #[test]
    fn test_expired() {
        let holder = Identity::generate();
        let ch = AuthenticationChallenge::new("example.com", Duration::seconds(30));
        let response = ch.respond(holder.did(), holder.keypair()).unwrap();
        let later = Utc::now() + Duration::minutes(1);
        assert!(matches!(
            response.verify(holder.did().uri(), later),
            Err(CredentialError::ChallengeExpired(_))
        ));
    }

    #[test]
    fn test_wrong_did() {
        let holder = Identity::generate();
        let other = Identity::generate();
        let ch = AuthenticationChallenge::new("example.com", Duration::minutes(5));
        let response = ch.respond(holder.did(), holder.keypair()).unwrap();
        assert!(matches!(
            response.verify(other.did().uri(), Utc::now()),
            Err(CredentialError::MalformedProof(_))
        ));
    }

    #[test]
    fn test_tampered_nonce() {
        let holder = Identity::generate();
        let ch = AuthenticationChallenge::new("example.com", Duration::minutes(5));
        let mut response = ch.respond(holder.did(), holder.keypair()).unwrap();
        response.challenge.challenge = "1111".into();
        assert!(matches!(
            response.verify(holder.did().uri(), Utc::now()),
            Err(CredentialError::InvalidSignature)
        ));
    }
}
