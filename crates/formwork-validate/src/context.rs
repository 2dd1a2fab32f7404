//! Validation context for async rules.

use crate::error::RemoteError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Trait for remote registry lookups.
#[async_trait]
pub trait RemoteDirectory: Send + Sync {
    /// Check if a value is already registered under a resource (e.g., "email").
    async fn is_registered(&self, resource: &str, value: &str) -> Result<bool, RemoteError>;
}

/// Context for async validation.
///
/// Provides the remote directory used by async rules.
///
/// ## Example
///
/// ```rust,ignore
/// use formwork_validate::prelude::*;
///
/// let ctx = ValidationContextBuilder::new()
///     .directory(InMemoryDirectory::new().register("email", "taken@example.com"))
///     .build();
/// ```
#[derive(Default)]
pub struct ValidationContext {
    directory: Option<Arc<dyn RemoteDirectory>>,
}

impl ValidationContext {
    /// Create a new empty validation context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the remote directory if configured.
    pub fn directory(&self) -> Option<&Arc<dyn RemoteDirectory>> {
        self.directory.as_ref()
    }

    /// Create a builder for constructing a validation context.
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::new()
    }
}

impl std::fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("has_directory", &self.directory.is_some())
            .finish()
    }
}

/// Builder for constructing a `ValidationContext`.
#[derive(Default)]
pub struct ValidationContextBuilder {
    directory: Option<Arc<dyn RemoteDirectory>>,
}

impl ValidationContextBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote directory.
    pub fn directory(mut self, directory: impl RemoteDirectory + 'static) -> Self {
        self.directory = Some(Arc::new(directory));
        self
    }

    /// Set the remote directory from an Arc.
    pub fn directory_arc(mut self, directory: Arc<dyn RemoteDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Build the validation context.
    pub fn build(self) -> ValidationContext {
        ValidationContext {
            directory: self.directory,
        }
    }
}

/// In-memory directory with simulated latency.
///
/// Stands in for a remote registry: every lookup sleeps for the configured
/// latency (on the tokio clock) before answering.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    registered: HashMap<String, HashSet<String>>,
    failing: HashSet<String>,
    latency: Duration,
    latency_overrides: HashMap<String, Duration>,
}

impl InMemoryDirectory {
    /// Create an empty directory that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a value as registered under a resource.
    pub fn register(mut self, resource: impl Into<String>, value: impl Into<String>) -> Self {
        self.registered
            .entry(resource.into())
            .or_default()
            .insert(value.into());
        self
    }

    /// Make lookups of this value fail with a transport error.
    pub fn fail_on(mut self, value: impl Into<String>) -> Self {
        self.failing.insert(value.into());
        self
    }

    /// Latency applied to every lookup.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Latency for one specific value, overriding the default.
    pub fn with_latency_for(mut self, value: impl Into<String>, latency: Duration) -> Self {
        self.latency_overrides.insert(value.into(), latency);
        self
    }

    fn latency_for(&self, value: &str) -> Duration {
        self.latency_overrides
            .get(value)
            .copied()
            .unwrap_or(self.latency)
    }
}

#[async_trait]
impl RemoteDirectory for InMemoryDirectory {
    async fn is_registered(&self, resource: &str, value: &str) -> Result<bool, RemoteError> {
        let latency = self.latency_for(value);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.failing.contains(value) {
            return Err(RemoteError::Lookup(format!("lookup of '{}' failed", value)));
        }

        Ok(self
            .registered
            .get(resource)
            .is_some_and(|values| values.contains(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_builder() {
        let ctx = ValidationContextBuilder::new()
            .directory(InMemoryDirectory::new())
            .build();
        assert!(ctx.directory().is_some());
        assert!(format!("{:?}", ctx).contains("has_directory: true"));
    }

    #[test]
    fn empty_context() {
        let ctx = ValidationContext::new();
        assert!(ctx.directory().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn directory_waits_for_latency() {
        let directory = InMemoryDirectory::new()
            .register("email", "axelmtz@gmail.com")
            .with_latency(Duration::from_secs(3));

        let start = tokio::time::Instant::now();
        let taken = directory
            .is_registered("email", "axelmtz@gmail.com")
            .await
            .unwrap();
        assert!(taken);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_override_per_value() {
        let directory = InMemoryDirectory::new()
            .with_latency(Duration::from_secs(3))
            .with_latency_for("fast@user.com", Duration::from_millis(10));

        let start = tokio::time::Instant::now();
        assert!(!directory.is_registered("email", "fast@user.com").await.unwrap());
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
