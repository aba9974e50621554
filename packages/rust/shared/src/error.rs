//! Error types for salonsite.
//!
//! Library crates use [`SalonSiteError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all salonsite operations.
#[derive(Debug, thiserror::Error)]
pub enum SalonSiteError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a sheet.
    #[error("network error: {0}")]
    Network(String),

    /// CSV parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Template loading or rendering error.
    #[error("template error: {0}")]
    Template(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (unexpected response body, bad date flag, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// None of the stores in the canonical order is present and active.
    #[error("no active stores found")]
    NoActiveStores,
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SalonSiteError>;

impl SalonSiteError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
}
