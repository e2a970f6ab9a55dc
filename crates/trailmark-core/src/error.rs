//! Error types for Trailmark core services.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised by the core services.
#[derive(Debug)]
pub enum CoreError {
    /// A log file could not be created or opened.
    LogFile {
        /// The log file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A log level name could not be parsed.
    InvalidLogLevel(String),
}

impl CoreError {
    /// Create a log file error.
    pub fn log_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LogFile {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogFile { path, source } => {
                write!(f, "Failed to open log file '{}': {source}", path.display())
            }
            Self::InvalidLogLevel(name) => write!(f, "Unknown log level '{name}'"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::LogFile { source, .. } => Some(source),
            Self::InvalidLogLevel(_) => None,
        }
    }
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
