use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Multibase prefix of a `did:key` identifier (base58btc).
pub const DID_KEY_PREFIX: &str = "did:key:z";

/// Prefix of a `did:web` identifier.
pub const DID_WEB_PREFIX: &str = "did:web:";

/// Fragment naming the single verification method of a Sovra identity.
pub const PRIMARY_KEY_FRAGMENT: &str = "keys-1";

/// DID methods understood by Sovra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DidMethod {
    /// Self-certifying `did:key`, the public key is embedded in the identifier.
    Key,
    /// `did:web`, trusted by its domain. Never resolved locally.
    Web,
}

impl fmt::Display for DidMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => write!(f, "key"),
            Self::Web => write!(f, "web"),
        }
    }
}

/// Decentralized Identifier (DID).
/// Format: `did:key:z<base58>` or `did:web:<domain>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Did(String);

impl Did {
    /// Create a DID from a full URI string, checking its method.
    pub fn new(uri: impl Into<String>) -> Result<Self, CoreError> {
        let uri = uri.into();
        let parts: Vec<&str> = uri.splitn(3, ':').collect();
        if parts.len() < 3 || parts[0] != "did" || parts[2].is_empty() {
            return Err(CoreError::InvalidDid(format!(
                "DID must have format 'did:<method>:<identifier>', got: {}",
                uri
            )));
        }
        match parts[1] {
            "key" if !uri.starts_with(DID_KEY_PREFIX) => Err(CoreError::InvalidDid(format!(
                "did:key identifier must be base58btc multibase ('z' prefix), got: {}",
                uri
            ))),
            "key" | "web" => Ok(Self(uri)),
            other => Err(CoreError::UnsupportedMethod(other.to_string())),
        }
    }

    /// Build a `did:key` DID from the base58btc encoding of a multicodec
    /// key, without the leading `z`.
    pub fn from_key_multibase(bs58_key: &str) -> Self {
        Self(format!("{}{}", DID_KEY_PREFIX, bs58_key))
    }

    /// Build a `did:web` DID for a domain.
    pub fn web(domain: &str) -> Result<Self, CoreError> {
        Self::new(format!("{}{}", DID_WEB_PREFIX, domain))
    }

    /// Get the full DID URI.
    pub fn uri(&self) -> &str {
        &self.0
    }

    /// The DID method.
    pub fn method(&self) -> DidMethod {
        if self.0.starts_with(DID_KEY_PREFIX) {
            DidMethod::Key
        } else {
            DidMethod::Web
        }
    }

    /// Method-specific identifier (everything after `did:<method>:`).
    pub fn identifier(&self) -> &str {
        self.0.splitn(3, ':').nth(2).unwrap_or_default()
    }

    /// DID URL of the primary verification method (`<did>#keys-1`).
    pub fn verification_method_id(&self) -> String {
        format!("{}#{}", self.0, PRIMARY_KEY_FRAGMENT)
    }
}

impl FromStr for Did {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
