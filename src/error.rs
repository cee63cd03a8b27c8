//! Configuration error types
//!
//! The simulation itself never fails: invalid transitions are guarded no-ops.
//! Loading a level definition is the one fallible surface.

use std::fmt;

/// Why a session configuration could not be used
#[derive(Debug)]
pub enum ConfigError {
    /// Level file could not be read
    Io {
        path: String,
        source: std::io::Error,
    },

    /// JSON did not match the expected shape
    Parse(serde_json::Error),

    /// Well-formed but unplayable
    Invalid {
        /// Dotted path of the offending field, e.g. `waves[2].trigger_x`
        field: String,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read level file '{}': {}", path, source)
            }
            ConfigError::Parse(err) => write!(f, "invalid level JSON: {}", err),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid level definition at '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
