//! Selective disclosure over a credential subject.
//!
//! Redaction happens after issuance and does not re-sign: a credential whose
//! subject was narrowed no longer verifies against its issuer signature.

use serde_json::{Map, Value};

use crate::credential::Credential;

/// Copy of `subject` holding only the named fields. Absent names are
/// silently dropped.
pub fn reveal<S: AsRef<str>>(subject: &Map<String, Value>, fields: &[S]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|f| {
            let key = f.as_ref();
            subject.get(key).map(|v| (key.to_string(), v.clone()))
        })
        .collect()
}

impl Credential {
    /// Narrow the subject to the named fields.
    pub fn reveal<S: AsRef<str>>(&mut self, fields: &[S]) {
        self.credential_subject = reveal(&self.credential_subject, fields);
    }

    /// Remove every subject attribute.
    pub fn redact_all(&mut self) {
        self.credential_subject.clear();
    }
}
