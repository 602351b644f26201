use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use sovra_crypto::Signature;
use sovra_proof::range::RANGE_PROOF_TYPE;
use sovra_proof::RangeProof;

use crate::error::CredentialError;

/// Type tag of an Ed25519 signature proof.
pub const SIGNATURE_PROOF_TYPE: &str = "Ed25519Signature2018";

/// Proof purpose of an issuer signature over a credential.
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// Proof purpose of a holder signature over a presentation or an
/// authentication challenge.
pub const AUTHENTICATION: &str = "authentication";

/// Ed25519 signature proof over a document's canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureProof {
    #[serde(rename = "type")]
    pub proof_type: String,
    /// RFC 3339 UTC timestamp, seconds precision.
    pub created: String,
    pub proof_purpose: String,
    pub verification_method: String,
    /// Lower-case hex of the 64-byte signature.
    pub jws: String,
}

impl SignatureProof {
    /// Wrap a fresh signature, stamped with the current time.
    pub fn new(purpose: &str, verification_method: &str, signature: &Signature) -> Self {
        Self {
            proof_type: SIGNATURE_PROOF_TYPE.to_string(),
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            proof_purpose: purpose.to_string(),
            verification_method: verification_method.to_string(),
            jws: signature.to_hex(),
        }
    }

    /// Decode the `jws` field.
    pub fn signature(&self) -> Result<Signature, CredentialError> {
        Signature::from_hex(&self.jws)
            .map_err(|e| CredentialError::MalformedProof(format!("jws: {}", e)))
    }
}

/// A proof entry, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proof {
    Signature(SignatureProof),
    Range(RangeProof),
}

impl Proof {
    /// The `type` tag of this proof.
    pub fn proof_type(&self) -> &str {
        match self {
            Self::Signature(p) => &p.proof_type,
            Self::Range(p) => &p.proof_type,
        }
    }

    /// Encode as the opaque JSON value stored in a proof sequence.
    pub fn to_value(&self) -> Result<Value, CredentialError> {
        let value = match self {
            Self::Signature(p) => serde_json::to_value(p)?,
            Self::Range(p) => serde_json::to_value(p)?,
        };
        Ok(value)
    }

    /// Decode a stored proof by its `type` tag.
    pub fn from_value(value: &Value) -> Result<Self, CredentialError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CredentialError::MalformedProof("proof has no 'type'".into()))?;

        match tag {
            SIGNATURE_PROOF_TYPE => SignatureProof::deserialize(value)
                .map(Self::Signature)
                .map_err(|e| CredentialError::MalformedProof(e.to_string())),
            RANGE_PROOF_TYPE => RangeProof::deserialize(value)
                .map(Self::Range)
                .map_err(|e| CredentialError::MalformedProof(e.to_string())),
            other => Err(CredentialError::MalformedProof(format!(
                "unknown proof type '{}'",
                other
            ))),
        }
    }
}

/// Decode the trailing signature proof of a proof sequence.
pub(crate) fn last_signature_proof(proofs: &[Value]) -> Result<SignatureProof, CredentialError> {
    let last = proofs.last().ok_or(CredentialError::NoProof)?;
    match Proof::from_value(last)? {
        Proof::Signature(p) => Ok(p),
        other => Err(CredentialError::MalformedProof(format!(
            "last proof must be a signature, found '{}'",
            other.proof_type()
        ))),
    }
}
