//! Ordered rule sets attached to fields.

use crate::context::ValidationContext;
use crate::error::{ErrorDescriptor, RemoteError};
use crate::traits::{AsyncRule, Rule};
use crate::value::Value;
use std::sync::Arc;

/// The ordered sync and async rules of one field.
///
/// Collections share one `RuleSet` between all their items.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
    async_rules: Vec<Arc<dyn AsyncRule>>,
}

impl RuleSet {
    /// Create an empty rule set. Every value passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sync rule.
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Append an async rule.
    pub fn async_rule(mut self, rule: impl AsyncRule + 'static) -> Self {
        self.async_rules.push(Arc::new(rule));
        self
    }

    /// Append a boxed sync rule.
    pub fn boxed_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a shared async rule.
    pub fn shared_async_rule(mut self, rule: Arc<dyn AsyncRule>) -> Self {
        self.async_rules.push(rule);
        self
    }

    /// Sync rules in declared order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Async rules in declared order.
    pub fn async_rules(&self) -> &[Arc<dyn AsyncRule>] {
        &self.async_rules
    }

    /// Whether any async rule is declared.
    pub fn has_async(&self) -> bool {
        !self.async_rules.is_empty()
    }

    /// Run the sync rules in order; the first failure wins.
    pub fn evaluate(&self, value: &Value) -> Option<ErrorDescriptor> {
        for rule in &self.rules {
            if let Err(err) = rule.validate(value) {
                tracing::trace!(rule = rule.rule_name(), code = err.code(), "sync rule failed");
                return Some(err);
            }
        }
        None
    }

    /// Run the async rules in order; the first conflict wins.
    ///
    /// Stops at the first transport failure.
    pub async fn check_async(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<Option<ErrorDescriptor>, RemoteError> {
        for rule in &self.async_rules {
            if let Some(err) = rule.check(value, ctx).await? {
                tracing::trace!(rule = rule.rule_name(), "async rule reported a conflict");
                return Ok(Some(err));
            }
        }
        Ok(None)
    }
}
