use serde::{Deserialize, Serialize};

use sovra_core::Did;
use sovra_crypto::PublicKey;

use crate::error::IdentityError;

/// JSON-LD context of a DID Document.
pub const DID_CONTEXT_V1: &str = "https://www.w3.org/ns/did/v1";

/// Verification method type for Ed25519 keys.
pub const ED25519_VERIFICATION_KEY_2018: &str = "Ed25519VerificationKey2018";

/// A verification method within a DID Document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Verification method identifier (e.g., "did:key:z6Mk…#keys-1").
    pub id: String,
    /// Type of the verification method.
    #[serde(rename = "type")]
    pub method_type: String,
    /// The DID that controls this verification method.
    pub controller: String,
    /// Base58-encoded public key material.
    pub public_key_base58: String,
}

/// W3C-compatible DID Document binding a DID to a single Ed25519 key.
///
/// Written once when an identity is created; there is no key rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// The DID subject.
    pub id: String,
    /// Verification methods (public keys) associated with this DID.
    pub verification_method: Vec<VerificationMethod>,
    /// Verification method ids usable for authentication.
    pub authentication: Vec<String>,
}

/// Build the DID Document of `did` for `public_key`.
pub fn build_did_document(did: &Did, public_key: &PublicKey) -> DidDocument {
    DidDocument::new(did, public_key)
}

impl DidDocument {
    /// Create a DID Document with one verification method, `<did>#keys-1`.
    pub fn new(did: &Did, public_key: &PublicKey) -> Self {
        let vm_id = did.verification_method_id();
        let vm = VerificationMethod {
            id: vm_id.clone(),
            method_type: ED25519_VERIFICATION_KEY_2018.to_string(),
            controller: did.uri().to_string(),
            public_key_base58: public_key.to_bs58(),
        };
        Self {
            context: vec![DID_CONTEXT_V1.to_string()],
            id: did.uri().to_string(),
            verification_method: vec![vm],
            authentication: vec![vm_id],
        }
    }

    /// Parse a document from its persisted JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, IdentityError> {
        let doc: Self = serde_json::from_slice(bytes)?;
        if doc.verification_method.is_empty() {
            return Err(IdentityError::InvalidDocument(format!(
                "{} has no verification method",
                doc.id
            )));
        }
        Ok(doc)
    }

    /// Serialize to indented JSON for storage.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, IdentityError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// The document's subject as a typed DID.
    pub fn did(&self) -> Result<Did, IdentityError> {
        Ok(Did::new(self.id.as_str())?)
    }

    /// The primary (first) verification method.
    pub fn primary_verification_method(&self) -> Option<&VerificationMethod> {
        self.verification_method.first()
    }

    /// Decode the primary verification method's public key.
    pub fn public_key(&self) -> Result<PublicKey, IdentityError> {
        let vm = self.primary_verification_method().ok_or_else(|| {
            IdentityError::InvalidDocument(format!("{} has no verification method", self.id))
        })?;
        Ok(PublicKey::from_bs58(&vm.public_key_base58)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::did::derive_did_key;
    use sovra_crypto::KeyPair;

    fn test_document() -> (DidDocument, PublicKey) {
        let kp = KeyPair::generate();
        let pk = kp.public_key();
        let did = derive_did_key(&pk);
        (build_did_document(&did, &pk), pk)
    }

    #[test]
    fn test_create_did_document() {
        let (doc, pk) = test_document();
        assert_eq!(doc.context, vec![DID_CONTEXT_V1.to_string()]);
        assert_eq!(doc.verification_method.len(), 1);
        let vm = &doc.verification_method[0];
        assert_eq!(vm.id, format!("{}#keys-1", doc.id));
        assert_eq!(vm.method_type, "Ed25519VerificationKey2018");
        assert_eq!(vm.controller, doc.id);
        assert_eq!(vm.public_key_base58, pk.to_bs58());
        assert_eq!(doc.authentication, vec![vm.id.clone()]);
    }

    #[test]
    fn test_json_field_names() {
        let (doc, _) = test_document();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["@context"][0], DID_CONTEXT_V1);
        assert!(value["verificationMethod"][0]["publicKeyBase58"].is_string());
        assert_eq!(
            value["verificationMethod"][0]["type"],
            "Ed25519VerificationKey2018"
        );
        assert!(value["authentication"].is_array());
    }

    #[test]
    fn test_public_key_recovered() {
        let (doc, pk) = test_document();
        assert_eq!(doc.public_key().unwrap(), pk);
    }

    #[test]
    fn test_json_bytes_roundtrip() {
        let (doc, _) = test_document();
        let bytes = doc.to_json_bytes().unwrap();
        let back = DidDocument::from_json_bytes(&bytes).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_from_json_without_verification_method() {
        let json = br#"{"@context":[],"id":"did:web:example.com","verificationMethod":[],"authentication":[]}"#;
        let result = DidDocument::from_json_bytes(json);
        assert!(matches!(result, Err(IdentityError::InvalidDocument(_))));
    }

    #[test]
    fn test_from_malformed_json() {
        let result = DidDocument::from_json_bytes(b"{not json");
        assert!(matches!(result, Err(IdentityError::Serialization(_))));
    }
}
