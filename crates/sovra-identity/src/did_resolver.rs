use sovra_crypto::PublicKey;

use crate::did::resolve_did_key_public_key;
use crate::error::IdentityError;

/// Trait for resolving a DID to the public key that signs on its behalf.
pub trait DidResolver: Send + Sync {
    /// Resolve a DID URI to its signing public key.
    fn resolve_public_key(&self, did: &str) -> Result<PublicKey, IdentityError>;
}

/// Resolves self-certifying `did:key` identifiers without any lookup.
///
/// Every other method fails with `UnsupportedMethod`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DidKeyResolver;

impl DidResolver for DidKeyResolver {
    fn resolve_public_key(&self, did: &str) -> Result<PublicKey, IdentityError> {
        resolve_did_key_public_key(did).inspect_err(|e| {
            tracing::debug!(did = did, error = %e, "did:key resolution failed");
        })
    }
}

impl<R: DidResolver + ?Sized> DidResolver for &R {
    fn resolve_public_key(&self, did: &str) -> Result<PublicKey, IdentityError> {
        (**self).resolve_public_key(did)
    }
}
