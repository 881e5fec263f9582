//! Coordinator configuration.
//!
//! A [`CoordinatorConfig`] is fixed when the coordinator is built. It can be
//! assembled in code with the `with_*` builders or read from a TOML document:
//!
//! ```toml
//! debounce_ms = 300
//! minimum_length = 2
//! cancel_superseded = true
//! reject_retires_in_flight = false
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Quiet period used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum keyword length used when none is configured.
pub const DEFAULT_MINIMUM_LENGTH: usize = 1;

/// Timing, gating and supersession policy for a
/// [`SearchCoordinator`](crate::SearchCoordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Quiet period before a keyword is emitted. Zero disables debouncing.
    pub debounce_interval: Duration,

    /// Keywords shorter than this (in user-perceived characters) are dropped.
    pub minimum_length: usize,

    /// Abort the query task of a superseded generation instead of letting it
    /// run to completion and ignoring the result.
    pub cancel_superseded: bool,

    /// Treat a gate-rejected keyword as newer input that retires the live
    /// generation, so a stale result never lands after the user shortened
    /// the keyword.
    pub reject_retires_in_flight: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce_interval: DEFAULT_DEBOUNCE,
            minimum_length: DEFAULT_MINIMUM_LENGTH,
            cancel_superseded: true,
            reject_retires_in_flight: false,
        }
    }
}

/// On-disk shape of the configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    debounce_ms: i64,
    minimum_length: usize,
    cancel_superseded: bool,
    reject_retires_in_flight: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        let defaults = CoordinatorConfig::default();
        Self {
            debounce_ms: i64::try_from(defaults.debounce_interval.as_millis()).unwrap_or(i64::MAX),
            minimum_length: defaults.minimum_length,
            cancel_superseded: defaults.cancel_superseded,
            reject_retires_in_flight: defaults.reject_retires_in_flight,
        }
    }
}

impl From<RawConfig> for CoordinatorConfig {
    fn from(raw: RawConfig) -> Self {
        Self::default()
            .with_debounce_millis(raw.debounce_ms)
            .with_minimum_length(raw.minimum_length)
            .with_cancel_superseded(raw.cancel_superseded)
            .with_reject_retires_in_flight(raw.reject_retires_in_flight)
    }
}

impl CoordinatorConfig {
    /// Create a config with the given debounce interval and minimum length.
    pub fn new(debounce_interval: Duration, minimum_length: usize) -> Self {
        Self {
            debounce_interval,
            minimum_length,
            ..Self::default()
        }
    }

    /// Set the debounce interval.
    pub const fn with_debounce(mut self, interval: Duration) -> Self {
        self.debounce_interval = interval;
        self
    }

    /// Set the debounce interval in milliseconds. Zero or negative values
    /// disable debouncing.
    pub fn with_debounce_millis(self, millis: i64) -> Self {
        let millis = u64::try_from(millis).unwrap_or(0);
        self.with_debounce(Duration::from_millis(millis))
    }

    /// Set the minimum accepted keyword length.
    pub const fn with_minimum_length(mut self, minimum_length: usize) -> Self {
        self.minimum_length = minimum_length;
        self
    }

    /// Choose whether superseded query tasks are aborted.
    pub const fn with_cancel_superseded(mut self, cancel: bool) -> Self {
        self.cancel_superseded = cancel;
        self
    }

    /// Choose whether gate rejections retire the live generation.
    pub const fn with_reject_retires_in_flight(mut self, retire: bool) -> Self {
        self.reject_retires_in_flight = retire;
        self
    }

    /// Parse a config from TOML text. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Ok(raw.into())
    }

    /// Read and parse a TOML config file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded coordinator config");
        Ok(config)
    }
}
