//! Error types
//!
//!     Formatting never fails: malformed input is passed through as well as the passes can.
//!     Errors only come from the surroundings: loading configuration, resolving pass names,
//!     file I/O in the command line tool and installing the log subscriber.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhpfmtError {
    /// Configuration could not be loaded or deserialized.
    Config(String),
    /// A pass name that is not in the registry.
    UnknownPass { name: String, available: String },
    Io { path: String, message: String },
    /// The tracing subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for PhpfmtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpfmtError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PhpfmtError::UnknownPass { name, available } => {
                write!(f, "Unknown pass '{}' (available: {})", name, available)
            }
            PhpfmtError::Io { path, message } => write!(f, "{}: {}", path, message),
            PhpfmtError::Logging(msg) => write!(f, "Failed to initialize logging: {}", msg),
        }
    }
}

impl std::error::Error for PhpfmtError {}

impl From<config::ConfigError> for PhpfmtError {
    fn from(err: config::ConfigError) -> Self {
        PhpfmtError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhpfmtError>;
