//! Sovra Core — Fundamental types, errors, and constants shared by the
//! Sovra identity crates.

pub mod config;
pub mod error;
pub mod revocation_state;
pub mod types;

pub use config::IdentityContext;
pub use error::CoreError;
pub use revocation_state::RevocationStatus;
pub use types::{Did, DidMethod};
