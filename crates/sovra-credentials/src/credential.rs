use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sovra_core::Did;
use sovra_crypto::KeyPair;

use crate::challenge::{numeric_attribute, Challenge};
use crate::error::CredentialError;
use crate::proof::{Proof, SignatureProof, ASSERTION_METHOD};

/// JSON-LD context of W3C verifiable credentials and presentations.
pub const CREDENTIALS_CONTEXT_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// Base type of every credential.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// strftime pattern of timestamp-derived credential identifiers.
pub const CREDENTIAL_ID_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// A W3C Verifiable Credential.
///
/// The proof sequence is append-only. The last entry is the issuer
/// signature; earlier entries are range proofs attached before signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    pub issuer: String,
    /// UTC timestamp; only the form this type re-serializes to is accepted.
    #[serde(deserialize_with = "canonical_date::deserialize")]
    pub issuance_date: DateTime<Utc>,
    pub credential_subject: Map<String, Value>,
    #[serde(default)]
    pub proof: Vec<Value>,
}

/// Borrowed view of a credential in canonical field order with an empty
/// proof sequence.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalCredential<'a> {
    #[serde(rename = "@context")]
    context: &'a [String],
    id: &'a str,
    #[serde(rename = "type")]
    credential_type: &'a [String],
    issuer: &'a str,
    issuance_date: &'a DateTime<Utc>,
    credential_subject: &'a Map<String, Value>,
    proof: &'a [Value],
}

/// Signatures cover the re-serialized date, so a timestamp whose text would
/// change on the way through (`+02:00` offsets, one or two fraction digits)
/// is refused at parse time instead of failing later as a bad signature.
mod canonical_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::{self, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let parsed = DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| de::Error::custom(format!("issuanceDate '{}': {}", raw, e)))?
            .with_timezone(&Utc);
        if parsed.to_rfc3339_opts(SecondsFormat::AutoSi, true) != raw {
            return Err(de::Error::custom(format!(
                "issuanceDate '{}' is not a canonical UTC timestamp",
                raw
            )));
        }
        Ok(parsed)
    }
}

/// Identifier derived from a timestamp, e.g. `20240501T093000Z`.
pub fn timestamp_id(at: DateTime<Utc>) -> String {
    at.format(CREDENTIAL_ID_FORMAT).to_string()
}

impl Credential {
    /// Create an unsigned credential. An empty `id` is replaced by a
    /// timestamp-derived identifier.
    pub fn new(id: impl Into<String>, issuer: &Did, subject: Map<String, Value>) -> Self {
        let now = Utc::now().trunc_subsecs(0);
        let mut id = id.into();
        if id.is_empty() {
            id = timestamp_id(now);
        }
        Self {
            context: vec![CREDENTIALS_CONTEXT_V1.to_string()],
            id,
            credential_type: vec![VERIFIABLE_CREDENTIAL_TYPE.to_string()],
            issuer: issuer.uri().to_string(),
            issuance_date: now,
            credential_subject: subject,
            proof: Vec::new(),
        }
    }

    /// Parse a credential document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(|e| CredentialError::InvalidJson(e.to_string()))
    }

    /// Pretty JSON suitable for persisting verbatim.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// The bytes covered by the issuer signature: compact JSON with the
    /// proof sequence emptied.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        let view = CanonicalCredential {
            context: &self.context,
            id: &self.id,
            credential_type: &self.credential_type,
            issuer: &self.issuer,
            issuance_date: &self.issuance_date,
            credential_subject: &self.credential_subject,
            proof: &[],
        };
        Ok(serde_json::to_vec(&view)?)
    }

    /// Sign the canonical bytes and append an `assertionMethod` signature
    /// proof. Every call appends a new proof.
    pub fn sign(
        &mut self,
        keypair: &KeyPair,
        verification_method: &str,
    ) -> Result<(), CredentialError> {
        let bytes = self.canonical_bytes()?;
        let signature = sovra_crypto::sign(&bytes, keypair);
        let proof = SignatureProof::new(ASSERTION_METHOD, verification_method, &signature);
        self.push_proof(&Proof::Signature(proof))?;
        tracing::info!(
            credential_id = %self.id,
            issuer = %self.issuer,
            "credential signed"
        );
        Ok(())
    }

    /// Append a proof to the sequence.
    pub fn push_proof(&mut self, proof: &Proof) -> Result<(), CredentialError> {
        self.proof.push(proof.to_value()?);
        Ok(())
    }

    /// Decode every proof in the sequence.
    pub fn proofs(&self) -> Result<Vec<Proof>, CredentialError> {
        self.proof.iter().map(Proof::from_value).collect()
    }

    /// Whether the credential carries at least one proof.
    pub fn is_signed(&self) -> bool {
        !self.proof.is_empty()
    }

    /// Answer a challenge: prove the named attribute meets the threshold,
    /// append the range proof and delete the attribute from the subject.
    ///
    /// On error the credential is left untouched.
    pub fn attach_proof(&mut self, challenge: &Challenge) -> Result<(), CredentialError> {
        let request = challenge.range_request()?;
        let raw = self
            .credential_subject
            .get(&request.field)
            .ok_or_else(|| CredentialError::FieldMissing(request.field.clone()))?;
        let value = numeric_attribute(&request.field, raw)?;

        let range_proof = sovra_proof::generate_range_proof(value, request.min)?;
        let encoded = Proof::Range(range_proof).to_value()?;

        self.proof.push(encoded);
        self.credential_subject.remove(&request.field);
        tracing::debug!(
            credential_id = %self.id,
            field = %request.field,
            min = request.min,
            "range proof attached"
        );
        Ok(())
    }
}
