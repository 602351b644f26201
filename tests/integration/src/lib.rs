//! Fixtures shared by the cross-crate scenarios in `tests/`.

use serde_json::{Map, Value};
use std::path::PathBuf;

use sovra_credentials::Credential;
use sovra_identity::Identity;

/// Fresh, not yet created directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sovra-it-{}-{}", label, rand::random::<u64>()))
}

/// Subject map from a JSON object literal.
pub fn subject(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("subject must be a JSON object, got {}", other),
    }
}

/// Credential issued and signed by `issuer`.
pub fn issue(issuer: &Identity, id: &str, attributes: Value) -> Credential {
    let mut credential = Credential::new(id, issuer.did(), subject(attributes));
    credential
        .sign(issuer.keypair(), &issuer.verification_method_id())
        .expect("signing succeeds");
    credential
}
