//! Async evaluation scheduling with stale-result suppression.
//!
//! Evaluations are boxed futures held in a `FuturesUnordered`; nothing is
//! spawned. The owner of the form drives them, typically from a
//! `tokio::select!` branch of its event loop, and every result is checked
//! against the field's current generation before it is applied.

use crate::config::EngineConfig;
use crate::field::{Field, FieldId};
use formwork_validate::{ErrorDescriptor, RemoteError, ValidationContext};
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A finished evaluation, not yet applied to any field.
#[derive(Debug)]
pub(crate) struct AsyncOutcome {
    pub field: FieldId,
    pub generation: u64,
    /// `None` when the evaluation was coalesced away before reaching the remote
    pub error: Option<Option<ErrorDescriptor>>,
}

/// What became of one async evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Field the evaluation was started for
    pub field: FieldId,
    /// Field generation at start time
    pub generation: u64,
    /// `false` if the result was stale and discarded
    pub applied: bool,
    /// The evaluation's own result (`None` = passed or skipped)
    pub error: Option<ErrorDescriptor>,
}

/// Schedules async rules and tracks which evaluation is the latest per field.
pub(crate) struct ValidationRunner {
    context: Arc<ValidationContext>,
    config: EngineConfig,
    in_flight: FuturesUnordered<BoxFuture<'static, AsyncOutcome>>,
    latest: HashMap<FieldId, Arc<AtomicU64>>,
}

impl ValidationRunner {
    pub(crate) fn new(context: Arc<ValidationContext>, config: EngineConfig) -> Self {
        Self {
            context,
            config,
            in_flight: FuturesUnordered::new(),
            latest: HashMap::new(),
        }
    }

    pub(crate) fn context(&self) -> &Arc<ValidationContext> {
        &self.context
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of evaluations started and not yet observed, stale ones included.
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Call after a field's value changed and its sync rules ran.
    ///
    /// Supersedes older evaluations and starts a new one if the sync rules
    /// pass and the field has async rules.
    pub(crate) fn after_change(&mut self, field: &mut Field) {
        self.supersede(field);
        if field.needs_async() {
            self.schedule(field);
        }
    }

    /// Let in-flight evaluations of this field know they are outdated.
    pub(crate) fn supersede(&mut self, field: &Field) {
        if let Some(latest) = self.latest.get(&field.id()) {
            latest.store(field.generation(), Ordering::Release);
        }
    }

    /// Drop tracking for a field that no longer exists.
    pub(crate) fn forget(&mut self, id: FieldId) {
        self.latest.remove(&id);
    }

    fn schedule(&mut self, field: &mut Field) {
        field.begin_async();

        let id = field.id();
        let generation = field.generation();
        let latest = Arc::clone(self.latest.entry(id).or_default());
        latest.store(generation, Ordering::Release);

        let rules = Arc::clone(field.rules());
        let value = field.value().clone();
        let context = Arc::clone(&self.context);
        let EngineConfig {
            async_timeout,
            debounce,
        } = self.config.clone();

        tracing::debug!(field = ?id, generation, "scheduling async validation");

        self.in_flight.push(Box::pin(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
                if latest.load(Ordering::Acquire) != generation {
                    tracing::trace!(field = ?id, generation, "superseded during debounce");
                    return AsyncOutcome {
                        field: id,
                        generation,
                        error: None,
                    };
                }
            }

            let check = rules.check_async(&value, &context);
            let result = match async_timeout {
                Some(limit) => match tokio::time::timeout(limit, check).await {
                    Ok(result) => result,
                    Err(_) => Err(RemoteError::Timeout(limit)),
                },
                None => check.await,
            };

            let error = result.unwrap_or_else(|err| {
                tracing::warn!(field = ?id, error = %err, "async validation failed");
                Some(err.into())
            });

            AsyncOutcome {
                field: id,
                generation,
                error: Some(error),
            }
        }));
    }

    /// Wait for the next evaluation to finish, in completion order.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub(crate) async fn next_outcome(&mut self) -> Option<AsyncOutcome> {
        self.in_flight.next().await
    }
}

impl fmt::Debug for ValidationRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRunner")
            .field("context", &self.context)
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_validate::{
        InMemoryDirectory, RequiredRule, RuleSet, UniqueRule, ValidationContextBuilder,
    };
    use std::time::Duration;

    fn email_field() -> Field {
        Field::new(
            "",
            RuleSet::new()
                .rule(RequiredRule::new())
                .async_rule(UniqueRule::new("email")),
        )
    }

    fn runner(directory: InMemoryDirectory, config: EngineConfig) -> ValidationRunner {
        let ctx = ValidationContextBuilder::new().directory(directory).build();
        ValidationRunner::new(Arc::new(ctx), config)
    }

    #[tokio::test(start_paused = true)]
    async fn skips_async_when_sync_fails() {
        let mut runner = runner(InMemoryDirectory::new(), EngineConfig::default());
        let mut field = email_field();

        field.set_value("  ");
        runner.after_change(&mut field);

        assert_eq!(runner.in_flight(), 0);
        assert!(!field.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn schedules_when_sync_passes() {
        let directory = InMemoryDirectory::new().register("email", "axelmtz@gmail.com");
        let mut runner = runner(directory, EngineConfig::default());
        let mut field = email_field();

        field.set_value("axelmtz@gmail.com");
        runner.after_change(&mut field);
        assert!(field.is_pending());
        assert_eq!(runner.in_flight(), 1);

        let outcome = runner.next_outcome().await.unwrap();
        assert_eq!(outcome.field, field.id());
        assert_eq!(outcome.generation, field.generation());
        assert_eq!(
            outcome.error,
            Some(Some(ErrorDescriptor::RemoteConflict {
                reason: "email already registered".into()
            }))
        );
        assert!(runner.next_outcome().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_resolves_to_conflict() {
        let directory = InMemoryDirectory::new().with_latency(Duration::from_secs(10));
        let config = EngineConfig::new().with_async_timeout(Duration::from_secs(1));
        let mut runner = runner(directory, config);
        let mut field = email_field();

        field.set_value("slow@user.com");
        runner.after_change(&mut field);

        let outcome = runner.next_outcome().await.unwrap();
        let error = outcome.error.flatten().unwrap();
        assert_eq!(error.code(), "remoteConflict");
        assert_eq!(error, ErrorDescriptor::from(RemoteError::Timeout(Duration::from_secs(1))));
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_coalesces_superseded_checks() {
        let config = EngineConfig::new().with_debounce(Duration::from_millis(300));
        let mut runner = runner(InMemoryDirectory::new(), config);
        let mut field = email_field();

        field.set_value("a@user.com");
        runner.after_change(&mut field);
        field.set_value("ab@user.com");
        runner.after_change(&mut field);
        assert_eq!(runner.in_flight(), 2);

        let mut skipped = 0;
        let mut checked = Vec::new();
        while let Some(outcome) = runner.next_outcome().await {
            match outcome.error {
                None => skipped += 1,
                Some(_) => checked.push(outcome.generation),
            }
        }
        assert_eq!(skipped, 1);
        assert_eq!(checked, vec![field.generation()]);
    }

    #[tokio::test]
    async fn missing_directory_resolves_to_conflict() {
        let mut runner = ValidationRunner::new(
            Arc::new(ValidationContext::new()),
            EngineConfig::default(),
        );
        let mut field = email_field();

        field.set_value("a@b.com");
        runner.after_change(&mut field);

        let outcome = runner.next_outcome().await.unwrap();
        assert_eq!(
            outcome.error.flatten(),
            Some(ErrorDescriptor::RemoteConflict {
                reason: "remote directory not configured".into()
            })
        );
    }
}
