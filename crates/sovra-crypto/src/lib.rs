pub mod error;
pub mod keys;
pub mod signing;

pub use error::CryptoError;
pub use keys::{KeyPair, PublicKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
pub use signing::{sign, verify, Signature, SIGNATURE_LENGTH};
