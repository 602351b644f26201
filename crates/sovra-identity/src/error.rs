/// Identity-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    #[error("invalid DID encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid DID document: {0}")]
    InvalidDocument(String),

    #[error("core error: {0}")]
    Core(#[from] sovra_core::CoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] sovra_crypto::CryptoError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
