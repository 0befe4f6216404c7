//! Log entry types
//!
//! Core types for representing one log line between formatting and write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a log line
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Prefix written after the timestamp, e.g. `[info]:`
    pub fn tag(self) -> &'static str {
        match self {
            Self::Debug => "[debug]:",
            Self::Info => "[info]:",
            Self::Warn => "[warn]:",
            Self::Error => "[error]:",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// A formatted line waiting to be written
///
/// `date` is the calendar day of the line's timestamp; rotation compares it
/// against the day of the open file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub date: NaiveDate,
    pub line: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(LogLevel::Debug.tag(), "[debug]:");
        assert_eq!(LogLevel::Info.tag(), "[info]:");
        assert_eq!(LogLevel::Warn.tag(), "[warn]:");
        assert_eq!(LogLevel::Error.tag(), "[error]:");
    }

    #[test]
    fn test_level_serde_lowercase() {
        let json = serde_json::to_string(&LogLevel::Warn).unwrap();
        assert_eq!(json, "\"warn\"");

        let level: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(level, LogLevel::Error);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
