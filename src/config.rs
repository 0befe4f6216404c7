//! Configuration management
//!
//! Config is a TOML file with a single `[log]` section. Every key is
//! optional; missing keys fall back to the writer defaults.

use crate::constants::{
    DEFAULT_BUF_SIZE, DEFAULT_CONFIG_FILE, DEFAULT_LOG_PATH, DEFAULT_SPLIT_LINES, MIN_BUF_SIZE,
};
use crate::error::{LogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
}

// =============================================================================
// Writer Configuration
// =============================================================================

/// Everything [`LogWriter`](crate::LogWriter) needs at init time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path; the date prefix is added to the file name
    pub path: PathBuf,
    /// Suppress all output (writes become no-ops)
    pub disabled: bool,
    /// Maximum length of one formatted line, in bytes
    pub buf_size: usize,
    /// Lines per file segment before a forced rotation
    pub split_lines: u64,
    /// Hand lines to a background flush thread instead of writing inline
    #[serde(rename = "async")]
    pub is_async: bool,
    /// How long the flush thread may sit on unflushed lines (async mode)
    pub flush_interval_ms: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_PATH),
            disabled: false,
            buf_size: DEFAULT_BUF_SIZE,
            split_lines: DEFAULT_SPLIT_LINES,
            is_async: false,
            flush_interval_ms: 250,
        }
    }
}

impl LogConfig {
    /// Defaults with the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn flush_interval(&self) -> Duration {
        if self.flush_interval_ms == 0 {
            Duration::from_millis(250)
        } else {
            Duration::from_millis(self.flush_interval_ms)
        }
    }

    /// Reject values the writer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.buf_size < MIN_BUF_SIZE {
            return Err(LogError::ConfigValidation {
                field: "buf_size",
                reason: format!("must be at least {} bytes, got {}", MIN_BUF_SIZE, self.buf_size),
            });
        }
        if self.split_lines == 0 {
            return Err(LogError::ConfigValidation {
                field: "split_lines",
                reason: "must be greater than 0".into(),
            });
        }
        if self.path.as_os_str().is_empty() {
            return Err(LogError::ConfigValidation {
                field: "path",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Load config from a file, failing on read or parse errors
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| LogError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| LogError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load `daylog.toml` from the working directory if present, defaults otherwise
pub fn load_default() -> Config {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if !path.exists() {
        return Config::default();
    }

    match load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

/// Render config as TOML
pub fn to_toml(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| LogError::ConfigValidation {
        field: "config",
        reason: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_config_values() {
        let config = LogConfig::default();

        assert_eq!(config.path, PathBuf::from("logs/server.log"));
        assert!(!config.disabled);
        assert_eq!(config.buf_size, 8192);
        assert_eq!(config.split_lines, 5_000_000);
        assert!(!config.is_async);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_config_partial_log_section() {
        let partial_toml = r#"
[log]
path = "/var/log/web/access.log"
async = true
split_lines = 1000
"#;

        let config: Config = toml::from_str(partial_toml).unwrap();

        assert_eq!(config.log.path, PathBuf::from("/var/log/web/access.log"));
        assert!(config.log.is_async);
        assert_eq!(config.log.split_lines, 1000);
        // Rest should be defaults
        assert_eq!(config.log.buf_size, 8192);
        assert!(!config.log.disabled);
    }

    #[test]
    fn test_config_toml_roundtrip_uses_async_key() {
        let config = Config {
            log: LogConfig {
                is_async: true,
                ..LogConfig::new("app.log")
            },
        };
        let text = to_toml(&config).unwrap();
        assert!(text.contains("async = true"));

        let restored: Config = toml::from_str(&text).unwrap();
        assert_eq!(restored.log, config.log);
    }

    #[test]
    fn test_validate_rejects_small_buffer() {
        let config = LogConfig {
            buf_size: 16,
            ..LogConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LogError::ConfigValidation { field: "buf_size", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_split_lines() {
        let config = LogConfig {
            split_lines: 0,
            ..LogConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LogError::ConfigValidation { field: "split_lines", .. })
        ));
    }

    #[test]
    fn test_flush_interval_zero_falls_back() {
        let config = LogConfig {
            flush_interval_ms: 0,
            ..LogConfig::default()
        };
        assert_eq!(config.flush_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = load(Path::new("/definitely/not/here/daylog.toml")).unwrap_err();
        assert!(matches!(err, LogError::ConfigRead { .. }));
    }
}
