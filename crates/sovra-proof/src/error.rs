/// Zero-knowledge proof errors.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("value {value} is below minimum {min}")]
    BelowMinimum { value: u64, min: u64 },

    #[error("invalid range parameters: {0}")]
    InvalidParameters(String),

    #[error("proof generation failed: {0}")]
    GenerationFailed(String),

    #[error("invalid proof data: {0}")]
    InvalidProofData(String),

    #[error("proof verification failed: {0}")]
    VerificationFailed(String),
}
