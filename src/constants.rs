//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Writer defaults
// =============================================================================

/// Default maximum length of one formatted line, in bytes
pub const DEFAULT_BUF_SIZE: usize = 8192;

/// Default number of lines per file segment before a forced rotation
pub const DEFAULT_SPLIT_LINES: u64 = 5_000_000;

/// Smallest accepted line buffer (prefix is 36 bytes at most)
pub const MIN_BUF_SIZE: usize = 64;

/// Bytes reserved at the end of the line buffer (newline + terminator)
pub const LINE_RESERVED_BYTES: usize = 2;

/// Default log file path used when the config names none
pub const DEFAULT_LOG_PATH: &str = "logs/server.log";

// =============================================================================
// Formats
// =============================================================================

/// Timestamp at the start of every line: `YYYY-MM-DD HH:MM:SS.ffffff`
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Date prefix of every log file name: `YYYY_MM_DD`
pub const FILE_DATE_FORMAT: &str = "%Y_%m_%d";

// =============================================================================
// Threads
// =============================================================================

/// Name of the background flush thread (async mode)
pub const FLUSH_THREAD_NAME: &str = "daylog-flush";

// =============================================================================
// Config
// =============================================================================

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "daylog.toml";
