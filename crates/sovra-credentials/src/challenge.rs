use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CredentialError;

/// Challenge type requesting a range proof over a numeric attribute.
pub const RANGE_CHALLENGE: &str = "range";

/// A proof challenge: `{"type": "range", "params": {"field": "age", "min": 18}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(rename = "type")]
    pub challenge_type: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Validated parameters of a range challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    pub field: String,
    pub min: u64,
}

impl Challenge {
    /// A range challenge on `field` with threshold `min`.
    pub fn range(field: impl Into<String>, min: u64) -> Self {
        let mut params = Map::new();
        params.insert("field".into(), Value::String(field.into()));
        params.insert("min".into(), Value::from(min));
        Self {
            challenge_type: RANGE_CHALLENGE.to_string(),
            params,
        }
    }

    /// Parse a challenge document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(|e| CredentialError::InvalidJson(e.to_string()))
    }

    /// Parse the compact `type:field:param` form, e.g. `range:age:18`.
    pub fn parse_spec(spec: &str) -> Result<Self, CredentialError> {
        let parts: Vec<&str> = spec.split(':').collect();
        let [kind, field, param] = parts.as_slice() else {
            return Err(CredentialError::InvalidChallenge(format!(
                "expected type:field:param, got '{}'",
                spec
            )));
        };
        match *kind {
            RANGE_CHALLENGE => {
                if field.is_empty() {
                    return Err(CredentialError::InvalidChallenge(format!(
                        "empty field in '{}'",
                        spec
                    )));
                }
                let min = param.parse::<u64>().map_err(|e| {
                    CredentialError::InvalidChallenge(format!("invalid min in '{}': {}", spec, e))
                })?;
                Ok(Self::range(*field, min))
            }
            other => Err(CredentialError::UnsupportedChallenge(other.to_string())),
        }
    }

    /// Validate a range challenge and extract its parameters.
    pub fn range_request(&self) -> Result<RangeRequest, CredentialError> {
        if self.challenge_type != RANGE_CHALLENGE {
            return Err(CredentialError::UnsupportedChallenge(
                self.challenge_type.clone(),
            ));
        }

        let field = match self.params.get("field") {
            Some(Value::String(f)) if !f.is_empty() => f.clone(),
            _ => {
                return Err(CredentialError::InvalidChallenge(
                    "range challenge missing or invalid 'field'".into(),
                ))
            }
        };

        let min = match self.params.get("min") {
            None => {
                return Err(CredentialError::InvalidChallenge(
                    "range challenge missing 'min'".into(),
                ))
            }
            Some(raw) => to_u64(raw).ok_or_else(|| {
                CredentialError::InvalidChallenge(format!("invalid 'min': {}", raw))
            })?,
        };

        Ok(RangeRequest { field, min })
    }
}

/// Read a subject attribute as an unsigned integer.
///
/// Accepts non-negative integers, non-negative floats (truncated) and
/// decimal strings.
pub fn numeric_attribute(field: &str, value: &Value) -> Result<u64, CredentialError> {
    to_u64(value).ok_or_else(|| CredentialError::UnsupportedValueType {
        field: field.to_string(),
        found: describe(value),
    })
}

fn to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "boolean".into(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string '{}'", s),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}
