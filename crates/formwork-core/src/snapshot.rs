//! Serializable views of form state handed to the code driving the form.

use formwork_validate::{ErrorDescriptor, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every error currently present in a form, touched or not.
///
/// Field errors are keyed by path: `"name"` for a single field or a
/// collection-level error, `"favoriteGames.1"` for a collection item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSnapshot {
    pub fields: BTreeMap<String, ErrorDescriptor>,
    /// First failing cross-field rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<ErrorDescriptor>,
    /// Paths with an async check still in flight
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub pending: Vec<String>,
}

impl ErrorSnapshot {
    /// No errors and nothing pending: the form may be submitted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_none() && self.pending.is_empty()
    }

    /// Number of field errors plus the form-level error.
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.form.is_some())
    }

    pub fn get(&self, path: &str) -> Option<&ErrorDescriptor> {
        self.fields.get(path)
    }

    pub fn is_pending(&self, path: &str) -> bool {
        self.pending.iter().any(|p| p == path)
    }

    /// Error kinds by path, handy for logging and assertions.
    pub fn codes(&self) -> BTreeMap<&str, &'static str> {
        self.fields
            .iter()
            .map(|(path, err)| (path.as_str(), err.code()))
            .collect()
    }
}

/// The value of one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Single(Value),
    List(Vec<Value>),
}

impl FormValue {
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(value) => Some(value),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::Single(_) => None,
            Self::List(values) => Some(values),
        }
    }
}

/// All control values, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(pub BTreeMap<String, FormValue>);

impl FormValues {
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Result of [`FormModel::submit`](crate::FormModel::submit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub ok: bool,
    /// Errors at submit time; empty when `ok`
    pub errors: ErrorSnapshot,
    /// Submitted values, captured before the reset; `None` when rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<FormValues>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_serializes_paths_and_form_error() {
        let mut snapshot = ErrorSnapshot::default();
        snapshot
            .fields
            .insert("favoriteGames.1".into(), ErrorDescriptor::Required);
        snapshot.form = Some(ErrorDescriptor::EqualsField {
            field_a: "password".into(),
            field_b: "password2".into(),
        });

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "fields": { "favoriteGames.1": { "kind": "required" } },
                "form": { "kind": "equalsField", "fieldA": "password", "fieldB": "password2" }
            })
        );
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn pending_alone_blocks_submission() {
        let snapshot = ErrorSnapshot {
            pending: vec!["email".into()],
            ..Default::default()
        };
        assert_eq!(snapshot.len(), 0);
        assert!(!snapshot.is_empty());
        assert!(snapshot.is_pending("email"));
    }

    #[test]
    fn values_serialize_flat() {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), FormValue::Single(Value::from("Abe")));
        values.insert(
            "favoriteGames".to_string(),
            FormValue::List(vec![Value::from("Halo Reach")]),
        );
        values.insert("terms".to_string(), FormValue::Single(Value::from(true)));
        let values = FormValues(values);

        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!({ "favoriteGames": ["Halo Reach"], "name": "Abe", "terms": true })
        );
        assert_eq!(values.get("name").and_then(FormValue::as_single), Some(&Value::from("Abe")));
    }
}
