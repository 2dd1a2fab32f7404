//! Field values.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// The value held by a form field.
///
/// Serializes untagged, so a form snapshot reads as plain JSON
/// (`null`, `true`, `"text"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value at all
    #[default]
    Null,
    /// Checkbox / switch state
    Bool(bool),
    /// Text input
    Text(String),
}

impl Value {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// `Null`, or text that is empty or whitespace only.
    ///
    /// Booleans are never empty: `false` is a real answer.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(_) => false,
            Value::Text(s) => s.trim().is_empty(),
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the flag, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String coercion used by text rules. `Null` coerces to `""`.
    pub fn coerce_str(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(b) => Cow::Owned(b.to_string()),
            Value::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coerce_str())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness() {
        assert!(Value::Null.is_empty());
        assert!(Value::from("").is_empty());
        assert!(Value::from("  \t").is_empty());
        assert!(!Value::from(" a ").is_empty());
        assert!(!Value::Bool(false).is_empty());
    }

    #[test]
    fn coercion() {
        assert_eq!(Value::Null.coerce_str(), "");
        assert_eq!(Value::Bool(true).coerce_str(), "true");
        assert_eq!(Value::from("Abe").coerce_str(), "Abe");
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Bool(true),
            Value::from("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,true,"x"]"#);

        let parsed: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[2], Value::from("x"));
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("M")), Value::from("M"));
    }
}
