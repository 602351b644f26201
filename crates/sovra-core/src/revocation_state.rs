use std::fmt;

use crate::error::CoreError;

/// Revocation status of a single credential identifier.
///
/// Valid transitions:
/// - NotRevoked → Revoked
///
/// `Revoked` is terminal. There is no suspended or pending status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RevocationStatus {
    /// The identifier is absent from the revocation list.
    NotRevoked,
    /// The identifier is present in the revocation list. Final state.
    Revoked,
}

impl RevocationStatus {
    /// Status derived from list membership.
    pub fn from_membership(present: bool) -> Self {
        if present {
            Self::Revoked
        } else {
            Self::NotRevoked
        }
    }

    /// Whether this is a final (terminal) status.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked)
    }

    /// Apply a revocation. Revoking an already revoked identifier is an
    /// error rather than a no-op.
    pub fn revoke(self) -> Result<Self, CoreError> {
        match self {
            Self::NotRevoked => {
                tracing::debug!(from = %self, to = %Self::Revoked, "revocation status transition");
                Ok(Self::Revoked)
            }
            Self::Revoked => Err(CoreError::InvalidStatusTransition {
                from: self,
                to: Self::Revoked,
            }),
        }
    }
}

impl fmt::Display for RevocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRevoked => write!(f, "NotRevoked"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_from_not_revoked() {
        let status = RevocationStatus::NotRevoked.revoke().unwrap();
        assert_eq!(status, RevocationStatus::Revoked);
        assert!(status.is_final());
    }

    #[test]
    fn test_revoke_twice_fails() {
        let result = RevocationStatus::Revoked.revoke();
        assert!(matches!(
            result,
            Err(CoreError::InvalidStatusTransition {
                from: RevocationStatus::Revoked,
                to: RevocationStatus::Revoked,
            })
        ));
    }

    #[test]
    fn test_from_membership() {
        assert_eq!(
            RevocationStatus::from_membership(true),
            RevocationStatus::Revoked
        );
        assert_eq!(
            RevocationStatus::from_membership(false),
            RevocationStatus::NotRevoked
        );
        assert!(!RevocationStatus::NotRevoked.is_final());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", RevocationStatus::Revoked), "Revoked");
        assert_eq!(format!("{}", RevocationStatus::NotRevoked), "NotRevoked");
    }
}
