//! Cross-field validation rules.

use crate::error::ErrorDescriptor;
use crate::traits::{CrossRule, FieldLookup};
use crate::value::Value;

/// Two fields must hold the same value (e.g., password and confirmation).
///
/// Values are compared as-is, byte for byte, so `true` never equals the
/// text `"true"`. A missing or null field reads as empty text, so "one
/// empty, the other not" is a mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualsFieldRule {
    pub field_a: String,
    pub field_b: String,
}

impl EqualsFieldRule {
    /// Create a new equality rule. Errors are surfaced on `field_b`.
    pub fn new(field_a: impl Into<String>, field_b: impl Into<String>) -> Self {
        Self {
            field_a: field_a.into(),
            field_b: field_b.into(),
        }
    }
}

fn read_or<'a>(form: &'a dyn FieldLookup, name: &str, empty: &'a Value) -> &'a Value {
    match form.lookup(name) {
        None | Some(Value::Null) => empty,
        Some(value) => value,
    }
}

impl CrossRule for EqualsFieldRule {
    fn validate(&self, form: &dyn FieldLookup) -> Result<(), ErrorDescriptor> {
        let empty = Value::Text(String::new());
        let a = read_or(form, &self.field_a, &empty);
        let b = read_or(form, &self.field_b, &empty);

        if a == b {
            Ok(())
        } else {
            Err(ErrorDescriptor::EqualsField {
                field_a: self.field_a.clone(),
                field_b: self.field_b.clone(),
            })
        }
    }

    fn fields(&self) -> Vec<&str> {
        vec![&self.field_a, &self.field_b]
    }

    fn rule_name(&self) -> &'static str {
        "equalsField"
    }
}
