//! Sovra Identity Layer
//!
//! Provides decentralised identity primitives for the Sovra protocol:
//! - Ed25519 identities with self-certifying `did:key` identifiers
//! - `did:key` public key recovery
//! - DID Documents (W3C-compatible)
//! - DID resolution behind a pluggable trait

pub mod did;
pub mod did_resolver;
pub mod document;
pub mod error;

pub use did::{derive_did_key, generate_key_pair, resolve_did_key_public_key, Identity};
pub use did_resolver::{DidKeyResolver, DidResolver};
pub use document::{build_did_document, DidDocument, VerificationMethod};
pub use error::IdentityError;
