use serde_json::Value;

use sovra_identity::{DidKeyResolver, DidResolver};

use crate::credential::Credential;
use crate::error::CredentialError;
use crate::presentation::Presentation;
use crate::proof::last_signature_proof;

/// Verifies credential and presentation signatures.
///
/// Signer keys are looked up through a [`DidResolver`]; the default only
/// understands self-certifying `did:key` identifiers. Revocation is not
/// consulted here.
#[derive(Debug, Clone, Default)]
pub struct Verifier<R = DidKeyResolver> {
    resolver: R,
}

impl Verifier<DidKeyResolver> {
    /// A verifier resolving `did:key` identifiers locally.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: DidResolver> Verifier<R> {
    /// A verifier backed by a custom resolver.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Check the issuer signature of a credential.
    pub fn verify_credential(&self, credential: &Credential) -> Result<(), CredentialError> {
        let canonical = credential.canonical_bytes()?;
        self.check_signature(&credential.issuer, &canonical, &credential.proof)
            .inspect_err(|e| {
                tracing::warn!(
                    credential_id = %credential.id,
                    issuer = %credential.issuer,
                    error = %e,
                    "credential rejected"
                );
            })?;
        tracing::debug!(credential_id = %credential.id, "credential signature valid");
        Ok(())
    }

    /// Check the holder signature of a presentation, then every embedded
    /// credential in order. The first failure wins.
    pub fn verify_presentation(&self, presentation: &Presentation) -> Result<(), CredentialError> {
        let canonical = presentation.canonical_bytes()?;
        self.check_signature(&presentation.holder, &canonical, &presentation.proof)
            .inspect_err(|e| {
                tracing::warn!(holder = %presentation.holder, error = %e, "presentation rejected");
            })?;

        for credential in &presentation.verifiable_credential {
            self.verify_credential(credential)
                .map_err(|e| CredentialError::EmbeddedCredential {
                    id: credential.id.clone(),
                    source: Box::new(e),
                })?;
        }

        tracing::info!(
            holder = %presentation.holder,
            credentials = presentation.verifiable_credential.len(),
            "presentation verified"
        );
        Ok(())
    }

    fn check_signature(
        &self,
        signer: &str,
        canonical: &[u8],
        proofs: &[Value],
    ) -> Result<(), CredentialError> {
        let proof = last_signature_proof(proofs)?;
        let signature = proof.signature()?;
        let public_key = self.resolver.resolve_public_key(signer)?;
        sovra_crypto::verify(canonical, &signature, &public_key)
            .map_err(|_| CredentialError::InvalidSignature)
    }
}

/// Verify a credential against its `did:key` issuer.
pub fn verify_credential(credential: &Credential) -> Result<(), CredentialError> {
    Verifier::new().verify_credential(credential)
}

/// Verify a presentation and every credential it embeds.
pub fn verify_presentation(presentation: &Presentation) -> Result<(), CredentialError> {
    Verifier::new().verify_presentation(presentation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sovra_crypto::PublicKey;
    use sovra_identity::{Identity, IdentityError};

    fn issued(issuer: &Identity, id: &str) -> Credential {
        let subject = json!({"age": 25, "name": "Ada"})
            .as_object()
            .cloned()
            .unwrap();
        let mut cred = Credential::new(id, issuer.did(), subject);
        cred.sign(issuer.keypair(), &issuer.verification_method_id())
            .unwrap();
        cred
    }

    fn flip_jws_byte(proofs: &mut [Value]) {
        let last = proofs.last_mut().unwrap();
        let jws = last["jws"].as_str().unwrap().to_string();
        let first = if jws.starts_with('0') { "1" } else { "0" };
        last["jws"] = Value::String(format!("{}{}", first, &jws[1..]));
    }

    #[test]
    fn test_valid_credential() {
        let issuer = Identity::generate();
        assert!(verify_credential(&issued(&issuer, "c1")).is_ok());
    }

    #[test]
    fn test_unsigned_credential() {
        let issuer = Identity::generate();
        let cred = Credential::new("c1", issuer.did(), Default::default());
        assert!(matches!(
            verify_credential(&cred),
            Err(CredentialError::NoProof)
        ));
    }

    #[test]
    fn test_tampered_subject() {
        let issuer = Identity::generate();
        let mut cred = issued(&issuer, "c1");
        cred.credential_subject.insert("age".into(), json!(99));
        assert!(matches!(
            verify_credential(&cred),
            Err(CredentialError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_signature() {
        let issuer = Identity::generate();
        let mut cred = issued(&issuer, "c1");
        flip_jws_byte(&mut cred.proof);
        assert!(matches!(
            verify_credential(&cred),
            Err(CredentialError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_jws() {
        let issuer = Identity::generate();
        let mut cred = issued(&issuer, "c1");
        cred.proof[0]["jws"] = json!("abc");
        assert!(matches!(
            verify_credential(&cred),
            Err(CredentialError::MalformedProof(_))
        ));
    }

    #[test]
    fn test_foreign_issuer_key() {
        let issuer = Identity::generate();
        let other = Identity::generate();
        let mut cred = issued(&issuer, "c1");
        cred.issuer = other.did().uri().to_string();
        assert!(matches!(
            verify_credential(&cred),
            Err(CredentialError::InvalidSignature)
        ));
    }

    #[test]
    fn test_unresolvable_issuer() {
        let issuer = Identity::generate();
        let mut cred = issued(&issuer, "c1");
        cred.issuer = "did:web:example.com".into();
        assert!(matches!(
            verify_credential(&cred),
            Err(CredentialError::Identity(IdentityError::UnsupportedMethod(_)))
        ));
        cred.issuer = "did:key:z111".into();
        assert!(matches!(
            verify_credential(&cred),
            Err(CredentialError::Identity(IdentityError::InvalidEncoding(_)))
        ));
    }

    #[test]
    fn test_custom_resolver() {
        struct Fixed(PublicKey);
        impl DidResolver for Fixed {
            fn resolve_public_key(&self, _did: &str) -> Result<PublicKey, IdentityError> {
                Ok(self.0.clone())
            }
        }

        let issuer = Identity::generate();
        let mut cred = issued(&issuer, "c1");
        cred.issuer = "did:web:issuer.example".into();
        let verifier = Verifier::with_resolver(Fixed(issuer.keypair().public_key()));
        // issuer is part of the signed bytes
        assert!(matches!(
            verifier.verify_credential(&cred),
            Err(CredentialError::InvalidSignature)
        ));
    }

    #[test]
    fn test_presentation_and_embedded() {
        let issuer = Identity::generate();
        let holder = Identity::generate();
        let mut pres = Presentation::new(
            vec![issued(&issuer, "c1"), issued(&issuer, "c2")],
            holder.did(),
        );
        pres.sign(holder.keypair(), &holder.verification_method_id())
            .unwrap();
        assert!(verify_presentation(&pres).is_ok());
    }

    #[test]
    fn test_presentation_embedded_failure_is_wrapped() {
        let issuer = Identity::generate();
        let holder = Identity::generate();
        let mut bad = issued(&issuer, "c2");
        flip_jws_byte(&mut bad.proof);
        let mut pres = Presentation::new(vec![issued(&issuer, "c1"), bad], holder.did());
        pres.sign(holder.keypair(), &holder.verification_method_id())
            .unwrap();
        match verify_presentation(&pres) {
            Err(CredentialError::EmbeddedCredential { id, source }) => {
                assert_eq!(id, "c2");
                assert!(matches!(*source, CredentialError::InvalidSignature));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_presentation_signed_by_wrong_holder() {
        let holder = Identity::generate();
        let intruder = Identity::generate();
        let mut pres = Presentation::new(vec![], holder.did());
        pres.sign(intruder.keypair(), &intruder.verification_method_id())
            .unwrap();
        assert!(matches!(
            verify_presentation(&pres),
            Err(CredentialError::InvalidSignature)
        ));
    }
}
