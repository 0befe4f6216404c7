//! Log writer: formatting, dispatch and the async flush thread.
//!
//! In sync mode the calling thread formats the line and writes it under the
//! file lock. In async mode the line is pushed onto a [`BlockingQueue`] and a
//! single flush thread writes it. That thread flushes the file whenever the
//! queue stays idle for `flush_interval`, and exits once the queue is closed
//! and drained.
//!
//! Producers never hold the file lock while pushing, and the flush thread
//! releases the queue lock before taking the file lock.

use super::clock::{Clock, SystemClock};
use super::file::{FileNaming, LogFile};
use super::format::format_line;
use super::stats::{StatsSnapshot, WriterStats};
use super::{LogLevel, LogRecord};
use crate::config::LogConfig;
use crate::constants::FLUSH_THREAD_NAME;
use crate::error::{LogError, Result};
use crate::queue::BlockingQueue;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// State shared with the flush thread
struct Shared {
    file: Mutex<LogFile>,
    stats: WriterStats,
}

/// Health snapshot of a writer
#[derive(Debug, Clone, Serialize)]
pub struct WriterStatus {
    pub path: PathBuf,
    pub current_day: NaiveDate,
    pub line_count: u64,
    pub is_async: bool,
    pub enabled: bool,
    pub closed: bool,
    /// Lines queued but not yet written (always 0 in sync mode)
    pub pending: usize,
    pub stats: StatsSnapshot,
    pub last_error: Option<String>,
}

/// Rotating file logger
pub struct LogWriter {
    shared: Arc<Shared>,
    queue: Option<Arc<BlockingQueue<LogRecord>>>,
    flusher: Mutex<Option<JoinHandle<()>>>,
    clock: Arc<dyn Clock>,
    buf_size: usize,
    enabled: AtomicBool,
    closed: AtomicBool,
}

impl LogWriter {
    /// Open the log file for today and, in async mode, start the flush thread
    pub fn init(config: &LogConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`init`](Self::init), with an explicit time source
    pub fn with_clock(config: &LogConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let naming = FileNaming::from_path(&config.path)?;
        let today = clock.now().date();
        let file = LogFile::open(naming, config.split_lines, today)?;
        debug!("Logging to {}", file.path().display());

        let shared = Arc::new(Shared {
            file: Mutex::new(file),
            stats: WriterStats::new(),
        });

        let (queue, flusher) = if config.is_async {
            let queue = Arc::new(BlockingQueue::new());
            let handle = spawn_flusher(queue.clone(), shared.clone(), config.flush_interval())?;
            (Some(queue), Some(handle))
        } else {
            (None, None)
        };

        Ok(Self {
            shared,
            queue,
            flusher: Mutex::new(flusher),
            clock,
            buf_size: config.buf_size,
            enabled: AtomicBool::new(!config.disabled),
            closed: AtomicBool::new(false),
        })
    }

    /// Format and dispatch one line.
    ///
    /// Never fails: I/O problems are counted and exposed through
    /// [`status`](Self::status) and [`last_error`](Self::last_error).
    pub fn write_log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled.load(Ordering::Acquire) || self.closed.load(Ordering::Acquire) {
            return;
        }

        let now = self.clock.now();
        let record = LogRecord {
            level,
            date: now.date(),
            line: format_line(now, level, args, self.buf_size),
        };

        match &self.queue {
            Some(queue) => {
                if queue.push(record) {
                    self.shared.stats.add_queued();
                }
            }
            None => {
                let mut file = self.shared.file.lock();
                file.append(&record, &self.shared.stats);
                file.flush(&self.shared.stats);
            }
        }
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.write_log(LogLevel::Debug, format_args!("{}", message));
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.write_log(LogLevel::Info, format_args!("{}", message));
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.write_log(LogLevel::Warn, format_args!("{}", message));
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.write_log(LogLevel::Error, format_args!("{}", message));
    }

    /// Flush what has been written so far. Queued lines are not waited for.
    pub fn flush(&self) {
        self.shared.file.lock().flush(&self.shared.stats);
    }

    /// Stop accepting lines, drain the queue, join the flush thread and flush.
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(queue) = &self.queue {
            queue.close();
        }
        if let Some(handle) = self.flusher.lock().take() {
            if handle.join().is_err() {
                warn!("Log flush thread panicked");
            }
        }
        self.flush();
        debug!("Log writer closed");
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn is_async(&self) -> bool {
        self.queue.is_some()
    }

    /// Path of the file currently receiving lines
    pub fn current_path(&self) -> PathBuf {
        self.shared.file.lock().path().to_path_buf()
    }

    /// Most recent open/rotate/write failure, if any
    pub fn last_error(&self) -> Option<String> {
        self.shared.file.lock().last_error().map(str::to_string)
    }

    pub fn status(&self) -> WriterStatus {
        let pending = self.queue.as_ref().map_or(0, |q| q.len());
        let file = self.shared.file.lock();
        WriterStatus {
            path: file.path().to_path_buf(),
            current_day: file.current_day(),
            line_count: file.line_count(),
            is_async: self.queue.is_some(),
            enabled: self.is_enabled(),
            closed: self.closed.load(Ordering::Acquire),
            pending,
            stats: self.shared.stats.snapshot(),
            last_error: file.last_error().map(str::to_string),
        }
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.close();
    }
}

fn spawn_flusher(
    queue: Arc<BlockingQueue<LogRecord>>,
    shared: Arc<Shared>,
    flush_interval: Duration,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(FLUSH_THREAD_NAME.to_string())
        .spawn(move || run_flusher(queue, shared, flush_interval))
        .map_err(|e| LogError::Spawn { source: e })
}

fn run_flusher(queue: Arc<BlockingQueue<LogRecord>>, shared: Arc<Shared>, flush_interval: Duration) {
    let mut dirty = false;

    loop {
        match queue.pop_timeout(flush_interval) {
            Some(record) => {
                shared.file.lock().append(&record, &shared.stats);
                dirty = true;
            }
            None if queue.is_closed() => break,
            None => {
                if dirty {
                    shared.file.lock().flush(&shared.stats);
                    dirty = false;
                }
            }
        }
    }

    shared.file.lock().flush(&shared.stats);
    debug!("Log flush thread exiting");
}
