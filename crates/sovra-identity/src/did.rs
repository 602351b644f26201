use sovra_core::types::DID_KEY_PREFIX;
use sovra_core::Did;
use sovra_crypto::{KeyPair, PublicKey};

use crate::document::DidDocument;
use crate::error::IdentityError;

/// Multicodec prefix identifying an Ed25519 public key.
pub const ED25519_MULTICODEC: [u8; 2] = [0xED, 0x01];

/// Generate a fresh Ed25519 key pair from OS entropy.
pub fn generate_key_pair() -> KeyPair {
    KeyPair::generate()
}

/// Derive the `did:key` identifier of a public key.
///
/// Format: `did:key:z<base58(0xED 0x01 ‖ pubkey)>`. Pure and deterministic.
pub fn derive_did_key(public_key: &PublicKey) -> Did {
    let mut data = Vec::with_capacity(ED25519_MULTICODEC.len() + public_key.as_bytes().len());
    data.extend_from_slice(&ED25519_MULTICODEC);
    data.extend_from_slice(public_key.as_bytes());
    Did::from_key_multibase(&bs58::encode(data).into_string())
}

/// Recover the Ed25519 public key embedded in a `did:key` identifier.
pub fn resolve_did_key_public_key(did: &str) -> Result<PublicKey, IdentityError> {
    let encoded = match did.strip_prefix(DID_KEY_PREFIX) {
        Some(encoded) => encoded,
        None if did.starts_with("did:key:") => {
            return Err(IdentityError::InvalidEncoding(format!(
                "did:key identifier is not base58btc multibase: {}",
                did
            )))
        }
        None => {
            let method = did.split(':').nth(1).unwrap_or(did);
            return Err(IdentityError::UnsupportedMethod(method.to_string()));
        }
    };

    let raw = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| IdentityError::InvalidEncoding(format!("invalid base58: {}", e)))?;

    let key_bytes = raw
        .strip_prefix(ED25519_MULTICODEC.as_slice())
        .ok_or_else(|| IdentityError::InvalidEncoding("invalid multicodec prefix".into()))?;

    PublicKey::from_bytes(key_bytes)
        .map_err(|e| IdentityError::InvalidEncoding(format!("invalid Ed25519 key: {}", e)))
}

/// A locally held identity: key pair, derived DID, and its DID Document.
#[derive(Debug)]
pub struct Identity {
    keypair: KeyPair,
    did: Did,
    document: DidDocument,
}

impl Identity {
    /// Generate a new identity with a fresh key pair.
    pub fn generate() -> Self {
        Self::from_keypair(generate_key_pair())
    }

    /// Build the identity of an existing key pair.
    pub fn from_keypair(keypair: KeyPair) -> Self {
        let public_key = keypair.public_key();
        let did = derive_did_key(&public_key);
        let document = DidDocument::new(&did, &public_key);
        tracing::info!(did = %did, "identity created");
        Self {
            keypair,
            did,
            document,
        }
    }

    /// Rebuild an identity from stored DID-document bytes and private key
    /// bytes, checking that the two belong together.
    pub fn from_parts(document_bytes: &[u8], keypair: KeyPair) -> Result<Self, IdentityError> {
        let document = DidDocument::from_json_bytes(document_bytes)?;
        let did = document.did()?;
        if document.public_key()? != keypair.public_key() {
            return Err(IdentityError::InvalidDocument(format!(
                "private key does not match the verification method of {}",
                did
            )));
        }
        Ok(Self {
            keypair,
            did,
            document,
        })
    }

    /// The identity's DID.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The identity's signing key pair.
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// The identity's DID Document.
    pub fn document(&self) -> &DidDocument {
        &self.document
    }

    /// DID URL of the signing verification method.
    pub fn verification_method_id(&self) -> String {
        self.did.verification_method_id()
    }
}
