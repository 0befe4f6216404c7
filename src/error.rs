//! Centralized error types for the logger
//!
//! All logger errors are represented by the `LogError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, LogError>`.

use std::fmt;
use std::path::PathBuf;

/// All logger errors
#[derive(Debug)]
pub enum LogError {
    // === Files ===
    /// Failed to open or create the initial log file
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to open the next file during rotation
    Rotate {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write or flush a line
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Config ===
    /// Failed to read the config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for `Config`
    ConfigParse { path: PathBuf, reason: String },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },

    // === Runtime ===
    /// Failed to spawn the background flush thread
    Spawn { source: std::io::Error },
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Rotate { source, .. }
            | Self::Write { source, .. }
            | Self::ConfigRead { source, .. }
            | Self::Spawn { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "Cannot open log file {}: {}", path.display(), source)
            }
            Self::Rotate { path, source } => {
                write!(f, "Cannot rotate to {}: {}", path.display(), source)
            }
            Self::Write { path, source } => {
                write!(f, "Cannot write to {}: {}", path.display(), source)
            }
            Self::ConfigRead { path, .. } => {
                write!(f, "Cannot read config: {}", path.display())
            }
            Self::ConfigParse { path, reason } => {
                write!(f, "Invalid config {}: {}", path.display(), reason)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::Spawn { .. } => write!(f, "Failed to spawn flush thread"),
        }
    }
}

/// Alias for Result with LogError
pub type Result<T> = std::result::Result<T, LogError>;
