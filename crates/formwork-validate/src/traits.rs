//! Core rule traits.

use crate::context::ValidationContext;
use crate::error::{ErrorDescriptor, RemoteError};
use crate::value::Value;
use async_trait::async_trait;
use std::fmt::Debug;

/// A synchronous rule over a single value.
///
/// Rules are pure: no side effects, and the same value always gives the
/// same answer.
///
/// ## Example
///
/// ```rust,ignore
/// use formwork_validate::prelude::*;
///
/// #[derive(Debug)]
/// struct NoDigits;
///
/// impl Rule for NoDigits {
///     fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor> {
///         if value.coerce_str().chars().any(|c| c.is_ascii_digit()) {
///             Err(ErrorDescriptor::Pattern { pattern: "no_digits".into() })
///         } else {
///             Ok(())
///         }
///     }
///
///     fn rule_name(&self) -> &'static str {
///         "no_digits"
///     }
/// }
/// ```
pub trait Rule: Debug + Send + Sync {
    /// Validate the value against this rule.
    fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor>;

    /// Get the rule name for logging.
    fn rule_name(&self) -> &'static str;
}

/// A rule that needs a remote answer.
///
/// `Ok(None)` means the value is acceptable, `Ok(Some(_))` is a genuine
/// conflict, and `Err(_)` means the check itself failed.
#[async_trait]
pub trait AsyncRule: Debug + Send + Sync {
    /// Check the value asynchronously.
    async fn check(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<Option<ErrorDescriptor>, RemoteError>;

    /// Get the rule name for logging.
    fn rule_name(&self) -> &'static str;
}

/// Read access to the current values of a form, by field name.
pub trait FieldLookup {
    /// The current value of a single field, `None` if there is no such field.
    fn lookup(&self, name: &str) -> Option<&Value>;
}

/// A rule over two or more fields of a form.
pub trait CrossRule: Debug + Send + Sync {
    /// Validate the form's current values.
    fn validate(&self, form: &dyn FieldLookup) -> Result<(), ErrorDescriptor>;

    /// Names of the fields this rule reads.
    fn fields(&self) -> Vec<&str>;

    /// Get the rule name for logging.
    fn rule_name(&self) -> &'static str;
}
