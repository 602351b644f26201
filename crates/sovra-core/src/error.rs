use crate::revocation_state::RevocationStatus;

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: RevocationStatus,
        to: RevocationStatus,
    },

    #[error("invalid DID format: {0}")]
    InvalidDid(String),

    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}
