//! Sovra Proof — Zero-knowledge range proofs for credential attributes.
//!
//! Proves that a hidden numeric attribute is at least a public minimum
//! (`value >= min`) using a single Bulletproof over `value - min`.

pub mod error;
pub mod range;

pub use error::ProofError;
pub use range::{
    generate_range_proof, range_parameters, verify_range_proof, RangeParameters, RangeProof,
    RangeProofPayload,
};
