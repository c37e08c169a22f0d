//! Error types for Juniper.
//!
//! Markup conversion itself is total and never fails. Errors only arise at
//! the edges: loading configuration files and interpreting module metadata.

use std::path::PathBuf;

/// Top-level error type for all Juniper operations that can fail.
#[derive(Debug, thiserror::Error)]
pub enum JuniperError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A module declared a `SourceType` we have no converter for.
    #[error("unknown source type: {0:?}")]
    UnknownSourceType(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, JuniperError>;

impl JuniperError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
