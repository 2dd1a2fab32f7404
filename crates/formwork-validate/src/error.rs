//! Error types for rule evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a value failed validation.
///
/// A tagged kind plus kind-specific payload. Serializes as
/// `{"kind": "minLength", "required": 3, "actual": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ErrorDescriptor {
    /// Value is missing or blank
    Required,
    /// Value must be exactly `true`
    RequiredTrue,
    /// Value does not fully match the named pattern
    Pattern { pattern: String },
    /// Value is shorter than `required` characters
    #[serde(rename_all = "camelCase")]
    MinLength { required: usize, actual: usize },
    /// Value is on the reserved list
    ReservedValue { value: String },
    /// Two fields that must hold the same value differ
    #[serde(rename_all = "camelCase")]
    EqualsField { field_a: String, field_b: String },
    /// A remote check rejected the value, or could not be completed
    RemoteConflict { reason: String },
    /// A collection holds fewer than `required` items
    #[serde(rename_all = "camelCase")]
    MinItems { required: usize, actual: usize },
}

impl ErrorDescriptor {
    /// The rule code (e.g., "required", "minLength").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorDescriptor::Required => "required",
            ErrorDescriptor::RequiredTrue => "requiredTrue",
            ErrorDescriptor::Pattern { .. } => "pattern",
            ErrorDescriptor::MinLength { .. } => "minLength",
            ErrorDescriptor::ReservedValue { .. } => "reservedValue",
            ErrorDescriptor::EqualsField { .. } => "equalsField",
            ErrorDescriptor::RemoteConflict { .. } => "remoteConflict",
            ErrorDescriptor::MinItems { .. } => "minItems",
        }
    }

    /// Kind-specific payload, keyed the way it serializes.
    pub fn params(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("kind");
                map
            }
            _ => serde_json::Map::new(),
        }
    }

    /// The field a form-level error should be shown on, if any.
    ///
    /// `equalsField` describes the pair but is surfaced on the second field.
    pub fn surface_field(&self) -> Option<&str> {
        match self {
            ErrorDescriptor::EqualsField { field_b, .. } => Some(field_b),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.params();
        if params.is_empty() {
            write!(f, "[{}]", self.code())
        } else {
            write!(f, "[{}] {}", self.code(), serde_json::Value::Object(params))
        }
    }
}

/// A remote check could not produce an answer.
///
/// Never surfaced as-is: the engine converts it into
/// [`ErrorDescriptor::RemoteConflict`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote directory not configured")]
    NotConfigured,

    #[error("remote lookup failed: {0}")]
    Lookup(String),

    #[error("remote lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl From<RemoteError> for ErrorDescriptor {
    fn from(err: RemoteError) -> Self {
        ErrorDescriptor::RemoteConflict {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let err = ErrorDescriptor::MinLength {
            required: 3,
            actual: 2,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "minLength", "required": 3, "actual": 2})
        );

        let err = ErrorDescriptor::EqualsField {
            field_a: "password".into(),
            field_b: "password2".into(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["fieldB"], "password2");
        assert_eq!(json["kind"], "equalsField");
    }

    #[test]
    fn unit_kinds_have_no_params() {
        assert!(ErrorDescriptor::Required.params().is_empty());
        assert_eq!(ErrorDescriptor::Required.to_string(), "[required]");
    }

    #[test]
    fn params_exclude_kind() {
        let params = ErrorDescriptor::ReservedValue {
            value: "strider".into(),
        }
        .params();
        assert_eq!(params.len(), 1);
        assert_eq!(params["value"], "strider");
    }

    #[test]
    fn equals_field_surfaces_on_second_field() {
        let err = ErrorDescriptor::EqualsField {
            field_a: "a".into(),
            field_b: "b".into(),
        };
        assert_eq!(err.surface_field(), Some("b"));
        assert_eq!(ErrorDescriptor::Required.surface_field(), None);
    }

    #[test]
    fn remote_error_maps_to_conflict() {
        let err: ErrorDescriptor = RemoteError::Lookup("connection reset".into()).into();
        assert_eq!(
            err,
            ErrorDescriptor::RemoteConflict {
                reason: "remote lookup failed: connection reset".into()
            }
        );
    }
}
