//! Error types for UseCase Scout.
//!
//! Library crates use [`ScoutError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level error type for all UseCase Scout operations.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration loading or credential resolution error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Rejected caller input (blank company name, missing credentials).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Network/HTTP error talking to an external service.
    #[error("{service} request failed: {message}")]
    Network { service: String, message: String },

    /// An external call did not finish within its deadline.
    #[error("{service} call timed out after {after:?}")]
    Timeout { service: String, after: Duration },

    /// An external service answered with a body we could not interpret.
    #[error("{service} returned a malformed response: {message}")]
    MalformedResponse { service: String, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScoutError>;

impl ScoutError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an invalid-input error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// Create a network error attributed to `service`.
    pub fn network(service: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Network {
            service: service.into(),
            message: msg.into(),
        }
    }

    /// Create a timeout error attributed to `service`.
    pub fn timeout(service: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            service: service.into(),
            after,
        }
    }

    /// Create a malformed-response error attributed to `service`.
    pub fn malformed(service: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service: service.into(),
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

    /// Whether this error came from an external collaborator.
    ///
    /// Such failures are never fatal to a pipeline run: the stage that hit
    /// them degrades to its empty output and reports a warning instead.
    pub fn is_external_failure(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::MalformedResponse { .. }
        )
    }
}
