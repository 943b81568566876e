//! Error types for the walkscore workspace.
//!
//! Library crates use [`WalkScoreError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all enrichment operations.
#[derive(Debug, thiserror::Error)]
pub enum WalkScoreError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed input table (CSV syntax or row shape).
    #[error("input error in {path:?}: {message}")]
    Input { path: PathBuf, message: String },

    /// Network/HTTP error while fetching a record's page.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a zero-length body.
    #[error("empty response body: {url}")]
    EmptyBody { url: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing to the output sink failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WalkScoreError>;

impl WalkScoreError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an input error for the given file.
    pub fn input(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error only affects a single record.
    ///
    /// Recoverable errors skip the record and let the run continue; everything
    /// else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::EmptyBody { .. })
    }
}
