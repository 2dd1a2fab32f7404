//! Human-readable messages for error descriptors.

use crate::error::ErrorDescriptor;
use std::collections::HashMap;

/// Maps each descriptor kind to a message template.
///
/// Templates use `{param}` placeholders filled from the descriptor payload,
/// e.g. `"minimum {required} characters"`.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let templates = [
            ("required", "this field is required"),
            ("requiredTrue", "this field must be accepted"),
            ("pattern", "invalid format"),
            ("minLength", "minimum {required} characters"),
            ("reservedValue", "'{value}' is not allowed"),
            ("equalsField", "{fieldA} and {fieldB} must match"),
            ("remoteConflict", "{reason}"),
            ("minItems", "at least {required} items required"),
        ]
        .into_iter()
        .map(|(code, template)| (code.to_string(), template.to_string()))
        .collect();

        Self { templates }
    }
}

impl MessageCatalog {
    /// Create a catalog with the default templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the template for one kind.
    pub fn with_template(mut self, code: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(code.into(), template.into());
        self
    }

    /// Get the raw template for a kind.
    pub fn template(&self, code: &str) -> Option<&str> {
        self.templates.get(code).map(String::as_str)
    }

    /// Render the message for a descriptor.
    ///
    /// Unknown kinds fall back to the descriptor code.
    pub fn message_for(&self, error: &ErrorDescriptor) -> String {
        let Some(template) = self.templates.get(error.code()) else {
            return error.code().to_string();
        };

        let mut result = template.clone();
        for (key, value) in error.params() {
            let placeholder = format!("{{{}}}", key);
            let replacement = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
        result
    }
}
