//! Error types for the reconciliation engine.
//!
//! [`Error`] covers systemic failures that abort an operation and produce no
//! result. Per-item problems inside a run never surface here; they are
//! collected as [`ItemFailure`]s on the run's summary instead.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Hard failures of a reconciliation operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A full Radarr sync is already running on this reconciler.
    #[error("sync already in progress")]
    AlreadyRunning,

    /// The operation observed cancellation and stopped.
    #[error("operation cancelled")]
    Cancelled,

    /// The library scanner could not produce results.
    #[error("scan failed: {0}")]
    Scan(String),

    /// The external source could not be read.
    #[error("fetch from radarr failed: {0}")]
    Fetch(String),

    /// A single-file match was requested for a path that does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A single-file match was requested for a non-media file.
    #[error("not a media file: {}", .0.display())]
    NotMediaFile(PathBuf),

    /// The caller supplied unusable input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The catalog rejected or failed an operation.
    #[error(transparent)]
    Catalog(#[from] cinesync_common::Error),
}

impl Error {
    pub fn scan(err: impl fmt::Display) -> Self {
        Self::Scan(err.to_string())
    }

    pub fn fetch(err: impl fmt::Display) -> Self {
        Self::Fetch(err.to_string())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A per-item failure recorded during a batch run.
///
/// `item` identifies what failed (a file path, `radarr movie 42`, ...) and
/// `cause` is the rendered error chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub item: String,
    pub cause: String,
}

impl ItemFailure {
    pub fn new(item: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            item: item.into(),
            cause: cause.to_string(),
        }
    }

    /// Build a failure from an `anyhow` error, keeping the full context chain.
    pub fn from_anyhow(item: impl Into<String>, err: &anyhow::Error) -> Self {
        Self {
            item: item.into(),
            cause: format!("{err:#}"),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item, self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::AlreadyRunning.to_string(), "sync already in progress");
        assert_eq!(
            Error::FileNotFound(PathBuf::from("/m/a.mkv")).to_string(),
            "file not found: /m/a.mkv"
        );
        assert_eq!(
            Error::fetch("connection refused").to_string(),
            "fetch from radarr failed: connection refused"
        );
    }

    #[test]
    fn test_catalog_error_is_transparent() {
        let err = Error::from(cinesync_common::Error::database("locked"));
        assert_eq!(err.to_string(), "Database error: locked");
    }

    #[test]
    fn test_item_failure_keeps_context() {
        let err = anyhow::anyhow!("timeout").context("search tmdb");
        let failure = ItemFailure::from_anyhow("/m/a.mkv", &err);
        assert_eq!(failure.cause, "search tmdb: timeout");
        assert_eq!(failure.to_string(), "/m/a.mkv: search tmdb: timeout");
    }
}
