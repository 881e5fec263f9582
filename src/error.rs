//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for query functions.
///
/// Query implementations report failures as `anyhow::Error`; the coordinator
/// wraps them in [`SearchError::Query`] before they reach the completion sink.
pub type Result<T> = anyhow::Result<T>;

/// Failure half of a [`SearchOutcome`](crate::SearchOutcome).
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The caller's query function rejected.
    #[error(transparent)]
    Query(#[from] anyhow::Error),

    /// The pipeline expected a settlement and got none (the query task
    /// panicked or vanished). Delivered with an empty keyword.
    #[error("search pipeline ended without a result")]
    Internal,
}

impl SearchError {
    /// Returns true for the structural-failure fallback.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Error returned when loading a [`CoordinatorConfig`](crate::CoordinatorConfig) fails.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for this crate.
    #[error("invalid coordinator config: {0}")]
    Parse(#[from] toml::de::Error),
}
