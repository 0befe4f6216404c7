//! daylog - rotating file logger with an optional async flush thread
//!
//! ```no_run
//! use daylog::{LogConfig, LogLevel, LogWriter};
//!
//! let config = LogConfig {
//!     is_async: true,
//!     ..LogConfig::new("logs/server.log")
//! };
//! let writer = LogWriter::init(&config)?;
//! writer.write_log(LogLevel::Info, format_args!("listening on {}", 8080));
//! writer.close();
//! # Ok::<(), daylog::LogError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod queue;

pub use config::{Config, LogConfig};
pub use error::{LogError, Result};
pub use logging::{Clock, LogLevel, LogWriter, ManualClock, SystemClock, WriterStatus};
pub use queue::BlockingQueue;
