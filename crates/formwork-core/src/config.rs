//! Engine configuration.
//!
//! Timing knobs for async evaluation, loadable from `FORMWORK_*`
//! environment variables.
//!
//! # Example
//!
//! ```ignore
//! use formwork_core::EngineConfig;
//!
//! // FORMWORK_ASYNC_TIMEOUT_MS=5000 FORMWORK_DEBOUNCE_MS=300
//! let config = EngineConfig::from_env().expect("Failed to load config");
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "FORMWORK_";

/// Async evaluation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Give up on a remote check after this long; `None` waits forever.
    pub async_timeout: Option<Duration>,
    /// Wait this long before calling the remote; superseded checks are skipped.
    pub debounce: Duration,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    async_timeout_ms: Option<u64>,
    #[serde(default)]
    debounce_ms: u64,
}

impl From<RawConfig> for EngineConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            async_timeout: raw.async_timeout_ms.map(Duration::from_millis),
            debounce: Duration::from_millis(raw.debounce_ms),
        }
    }
}

impl EngineConfig {
    /// Default settings: no timeout, no debounce.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote check timeout.
    pub fn with_async_timeout(mut self, timeout: Duration) -> Self {
        self.async_timeout = Some(timeout);
        self
    }

    /// Set the debounce interval.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Load from `FORMWORK_ASYNC_TIMEOUT_MS` and `FORMWORK_DEBOUNCE_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawConfig = envy::prefixed(ENV_PREFIX).from_env()?;
        Ok(raw.into())
    }

    /// Load from an explicit list of `(name, value)` pairs, using the same
    /// `FORMWORK_` names as [`EngineConfig::from_env`].
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw: RawConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        Ok(raw.into())
    }
}
