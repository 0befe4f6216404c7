//! File logging
//!
//! Centralizes all log-related types and utilities:
//! - `LogLevel` / `LogRecord` - Severity and one formatted line
//! - `LogWriter` - Sync or async writer with day/line rotation
//! - `Clock` - Time source for timestamps and day rollover
//! - `WriterStats` - Lock-free counters behind `LogWriter::status`

pub mod clock;
pub mod entry;
pub mod file;
pub mod format;
pub mod stats;
pub mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{LogLevel, LogRecord};
pub use stats::{LevelCounts, StatsSnapshot};
pub use writer::{LogWriter, WriterStatus};

/// Initialize internal tracing for diagnostics on stderr
///
/// Call early in main() before any logging occurs.
/// Set `verbose` to true for debug-level output.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}
