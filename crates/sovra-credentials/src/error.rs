use sovra_crypto::CryptoError;
use sovra_identity::IdentityError;
use sovra_proof::ProofError;

/// Credential layer errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("credentialSubject missing '{0}'")]
    FieldMissing(String),

    #[error("unsupported value for field '{field}': {found}")]
    UnsupportedValueType { field: String, found: String },

    #[error("invalid challenge: {0}")]
    InvalidChallenge(String),

    #[error("unsupported challenge type '{0}'")]
    UnsupportedChallenge(String),

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("document carries no proof")]
    NoProof,

    #[error("credential already revoked: {0}")]
    AlreadyRevoked(String),

    #[error("credential not found: {0}")]
    CredentialNotFound(String),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("embedded credential {id} failed verification: {source}")]
    EmbeddedCredential {
        id: String,
        #[source]
        source: Box<CredentialError>,
    },

    #[error("authentication challenge expired at {0}")]
    ChallengeExpired(String),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("proof error: {0}")]
    Proof(#[from] ProofError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
