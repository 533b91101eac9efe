//! Error types for pathfinder.
//!
//! Library crates use [`PathfinderError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Per-link failures (malformed URLs, links that fail validation, provider
//! outages) are absorbed inside the extraction pipeline and never surface
//! here as errors; see `pathfinder_core::pipeline`.

use std::path::PathBuf;

/// Top-level error type for all pathfinder operations.
#[derive(Debug, thiserror::Error)]
pub enum PathfinderError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to a third-party API.
    #[error("network error: {0}")]
    Network(String),

    /// Response or document parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A metadata provider could not answer (timeout, outage, missing record).
    #[error("{provider} unavailable: {message}")]
    ProviderUnavailable {
        provider: &'static str,
        message: String,
    },

    /// The roadmap generator failed to produce a usable document.
    #[error("roadmap generation failed: {0}")]
    Generator(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (empty topic, bad document shape, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The enclosing request was abandoned before completion.
    #[error("operation cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PathfinderError>;

impl PathfinderError {
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

    /// Create a generator error from any displayable message.
    pub fn generator(msg: impl Into<String>) -> Self {
        Self::Generator(msg.into())
    }

    /// Mark a provider as unavailable.
    pub fn unavailable(provider: &'static str, msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PathfinderError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = PathfinderError::unavailable("youtube", "HTTP 503");
        assert_eq!(err.to_string(), "youtube unavailable: HTTP 503");

        let err = PathfinderError::generator("LLM returned no steps");
        assert!(err.to_string().contains("no steps"));
    }

    #[test]
    fn cancelled_has_stable_message() {
        assert_eq!(PathfinderError::Cancelled.to_string(), "operation cancelled");
    }
}
