use serde::{Deserialize, Serialize};
use serde_json::Value;

use sovra_core::Did;
use sovra_crypto::KeyPair;

use crate::challenge::Challenge;
use crate::credential::{Credential, CREDENTIALS_CONTEXT_V1};
use crate::error::CredentialError;
use crate::proof::{Proof, SignatureProof, AUTHENTICATION};

/// Base type of every presentation.
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// A W3C Verifiable Presentation: credentials bundled and signed by a holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub presentation_type: Vec<String>,
    pub verifiable_credential: Vec<Credential>,
    pub holder: String,
    #[serde(default)]
    pub proof: Vec<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalPresentation<'a> {
    #[serde(rename = "@context")]
    context: &'a [String],
    #[serde(rename = "type")]
    presentation_type: &'a [String],
    verifiable_credential: &'a [Credential],
    holder: &'a str,
    proof: &'a [Value],
}

impl Presentation {
    /// Bundle credentials under a holder. Unsigned.
    pub fn new(credentials: Vec<Credential>, holder: &Did) -> Self {
        Self {
            context: vec![CREDENTIALS_CONTEXT_V1.to_string()],
            presentation_type: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
            verifiable_credential: credentials,
            holder: holder.uri().to_string(),
            proof: Vec::new(),
        }
    }

    /// Parse a presentation document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(|e| CredentialError::InvalidJson(e.to_string()))
    }

    /// Pretty JSON suitable for persisting verbatim.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Compact JSON with the presentation's own proof sequence emptied.
    /// Embedded credentials keep their proofs.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        let view = CanonicalPresentation {
            context: &self.context,
            presentation_type: &self.presentation_type,
            verifiable_credential: &self.verifiable_credential,
            holder: &self.holder,
            proof: &[],
        };
        Ok(serde_json::to_vec(&view)?)
    }

    /// Sign the canonical bytes and append an `authentication` proof.
    pub fn sign(
        &mut self,
        keypair: &KeyPair,
        verification_method: &str,
    ) -> Result<(), CredentialError> {
        let bytes = self.canonical_bytes()?;
        let signature = sovra_crypto::sign(&bytes, keypair);
        let proof = SignatureProof::new(AUTHENTICATION, verification_method, &signature);
        self.proof.push(Proof::Signature(proof).to_value()?);
        tracing::info!(
            holder = %self.holder,
            credentials = self.verifiable_credential.len(),
            "presentation signed"
        );
        Ok(())
    }

    /// Decode every proof of the presentation itself.
    pub fn proofs(&self) -> Result<Vec<Proof>, CredentialError> {
        self.proof.iter().map(Proof::from_value).collect()
    }
}

/// What a holder discloses when presenting credentials.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentationRequest {
    /// Fields to keep in each subject. `None` keeps everything.
    pub reveal: Option<Vec<String>>,
    /// Range challenges answered by every credential.
    pub challenges: Vec<Challenge>,
}

impl PresentationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reveal = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn challenge(mut self, challenge: Challenge) -> Self {
        self.challenges.push(challenge);
        self
    }
}

/// Apply a request to the credentials and wrap them in an unsigned
/// presentation.
///
/// Order: reveal, then every challenge on every credential. When challenges
/// were answered without an explicit reveal, every subject is emptied so no
/// raw attribute leaks next to its proof.
pub fn build_presentation(
    mut credentials: Vec<Credential>,
    holder: &Did,
    request: &PresentationRequest,
) -> Result<Presentation, CredentialError> {
    if let Some(fields) = &request.reveal {
        for credential in credentials.iter_mut() {
            credential.reveal(fields);
        }
    }

    for challenge in &request.challenges {
        for credential in credentials.iter_mut() {
            credential.attach_proof(challenge).inspect_err(|e| {
                tracing::warn!(
                    credential_id = %credential.id,
                    challenge = %challenge.challenge_type,
                    error = %e,
                    "challenge could not be answered"
                );
            })?;
        }
    }

    if !request.challenges.is_empty() && request.reveal.is_none() {
        credentials.iter_mut().for_each(Credential::redact_all);
    }

    Ok(Presentation::new(credentials, holder))
}
