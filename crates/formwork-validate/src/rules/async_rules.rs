//! Asynchronous validation rules.
//!
//! These rules need a remote answer, obtained through the
//! [`RemoteDirectory`](crate::context::RemoteDirectory) in the context.

use crate::context::ValidationContext;
use crate::error::{ErrorDescriptor, RemoteError};
use crate::traits::AsyncRule;
use crate::value::Value;
use async_trait::async_trait;

/// Uniqueness rule: the value must not already be registered.
///
/// Used for checks such as "is this email already registered".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueRule {
    /// Directory resource to look the value up in (e.g., "email")
    pub resource: String,
}

impl UniqueRule {
    /// Create a new uniqueness rule.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

#[async_trait]
impl AsyncRule for UniqueRule {
    async fn check(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<Option<ErrorDescriptor>, RemoteError> {
        let directory = ctx.directory().ok_or(RemoteError::NotConfigured)?;

        let key = value.coerce_str();
        if directory.is_registered(&self.resource, &key).await? {
            Ok(Some(ErrorDescriptor::RemoteConflict {
                reason: format!("{} already registered", self.resource),
            }))
        } else {
            Ok(None)
        }
    }

    fn rule_name(&self) -> &'static str {
        "unique"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{InMemoryDirectory, ValidationContextBuilder};

    fn ctx() -> ValidationContext {
        let directory = InMemoryDirectory::new().register("email", "axelmtz@gmail.com");
        ValidationContextBuilder::new().directory(directory).build()
    }

    #[tokio::test]
    async fn unique_rule_accepts_new_value() {
        let rule = UniqueRule::new("email");
        let result = rule.check(&Value::from("new@user.com"), &ctx()).await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn unique_rule_rejects_registered_value() {
        let rule = UniqueRule::new("email");
        let err = rule
            .check(&Value::from("axelmtz@gmail.com"), &ctx())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(err.code(), "remoteConflict");
        assert_eq!(
            err,
            ErrorDescriptor::RemoteConflict {
                reason: "email already registered".into()
            }
        );
    }

    #[tokio::test]
    async fn unique_rule_without_directory() {
        let rule = UniqueRule::new("email");
        let result = rule
            .check(&Value::from("a@b.com"), &ValidationContext::new())
            .await;
        assert_eq!(result, Err(RemoteError::NotConfigured));
    }

    #[tokio::test]
    async fn unique_rule_propagates_lookup_failure() {
        let directory = InMemoryDirectory::new().fail_on("boom@example.com");
        let ctx = ValidationContextBuilder::new().directory(directory).build();

        let result = UniqueRule::new("email")
            .check(&Value::from("boom@example.com"), &ctx)
            .await;
        assert!(matches!(result, Err(RemoteError::Lookup(_))));
    }
}
