//! Sovra Credentials
//!
//! Verifiable credentials and presentations for the Sovra protocol:
//! - Canonical signing of credentials and presentations
//! - Range-proof challenges and selective disclosure
//! - Signature verification through a pluggable DID resolver
//! - Credential stores and a file-backed revocation registry
//! - DID authentication challenges

pub mod auth;
pub mod challenge;
pub mod credential;
pub mod disclosure;
pub mod error;
pub mod presentation;
pub mod proof;
pub mod revocation;
pub mod store;
pub mod verifier;

pub use auth::{AuthenticationChallenge, AuthenticationResponse};
pub use challenge::{Challenge, RangeRequest};
pub use credential::Credential;
pub use disclosure::reveal;
pub use error::CredentialError;
pub use presentation::{build_presentation, Presentation, PresentationRequest};
pub use proof::{Proof, SignatureProof};
pub use revocation::RevocationList;
pub use store::{CredentialStore, FileCredentialStore, InMemoryCredentialStore};
pub use verifier::{verify_credential, verify_presentation, Verifier};
