//! Date-stamped log file with day and line-count rotation.
//!
//! File names are `<dir>/<YYYY>_<MM>_<DD>_<base>` for the first file of a day
//! and `<dir>/<YYYY>_<MM>_<DD>_<base>.<N>` for later segments of the same day.
//! The line counter survives segment rotation, so `N` only grows within a day.

use super::stats::WriterStats;
use super::LogRecord;
use crate::constants::FILE_DATE_FORMAT;
use crate::error::{LogError, Result};
use chrono::NaiveDate;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory and base name the dated file names are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNaming {
    dir: PathBuf,
    base: String,
}

impl FileNaming {
    /// Split a configured path into directory and base name
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.to_string_lossy().ends_with(std::path::is_separator) {
            return Err(LogError::ConfigValidation {
                field: "path",
                reason: format!("'{}' names a directory, not a file", path.display()),
            });
        }
        let base = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LogError::ConfigValidation {
                field: "path",
                reason: format!("no file name in '{}'", path.display()),
            })?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { dir, base })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First file of a day
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}_{}", date.format(FILE_DATE_FORMAT), self.base))
    }

    /// Numbered segment within a day
    pub fn segment_path(&self, date: NaiveDate, segment: u64) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.{}",
            date.format(FILE_DATE_FORMAT),
            self.base,
            segment
        ))
    }
}

/// Why the next line needs a new file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// The line belongs to a later day than the open file
    NewDay,
    /// The open file reached `split_lines`; carries the segment number
    Segment(u64),
}

/// Decide whether the next line needs a new file.
///
/// `line_count` is the number of lines already written since the last day
/// rollover. Day rollover wins over the line threshold.
pub fn rotation_for(
    current_day: NaiveDate,
    line_count: u64,
    split_lines: u64,
    line_date: NaiveDate,
) -> Option<Rotation> {
    if line_date > current_day {
        return Some(Rotation::NewDay);
    }
    if split_lines > 0 && line_count > 0 && line_count % split_lines == 0 {
        return Some(Rotation::Segment(line_count / split_lines));
    }
    None
}

/// The open log file plus the counters that drive rotation
pub struct LogFile {
    naming: FileNaming,
    split_lines: u64,
    writer: BufWriter<File>,
    path: PathBuf,
    current_day: NaiveDate,
    line_count: u64,
    last_error: Option<String>,
}

impl LogFile {
    /// Open (or create) the first file for `today`, creating its directory
    pub fn open(naming: FileNaming, split_lines: u64, today: NaiveDate) -> Result<Self> {
        let dir = naming.dir();
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| LogError::Open {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let path = naming.day_path(today);
        let file = open_append(&path).map_err(|e| LogError::Open {
            path: path.clone(),
            source: e,
        })?;

        Ok(Self {
            naming,
            split_lines,
            writer: BufWriter::new(file),
            path,
            current_day: today,
            line_count: 0,
            last_error: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_day(&self) -> NaiveDate {
        self.current_day
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Rotate if needed, then write the record's line.
    ///
    /// Failures never abort the call: they are counted, logged and kept as
    /// the last error.
    pub fn append(&mut self, record: &LogRecord, stats: &WriterStats) {
        if let Some(rotation) = rotation_for(
            self.current_day,
            self.line_count,
            self.split_lines,
            record.date,
        ) {
            if let Err(e) = self.rotate(rotation, record.date) {
                self.record_error(e, stats);
            } else {
                stats.add_rotation();
            }
        }

        match self.writer.write_all(record.line.as_bytes()) {
            Ok(()) => {
                self.line_count += 1;
                stats.add_written(record.level);
            }
            Err(e) => {
                let err = LogError::Write {
                    path: self.path.clone(),
                    source: e,
                };
                self.record_error(err, stats);
            }
        }
    }

    /// Push buffered lines to the OS
    pub fn flush(&mut self, stats: &WriterStats) {
        if let Err(e) = self.writer.flush() {
            let err = LogError::Write {
                path: self.path.clone(),
                source: e,
            };
            self.record_error(err, stats);
        }
    }

    /// Switch to the next file. On failure the current file stays open and
    /// the counters are left untouched.
    fn rotate(&mut self, rotation: Rotation, date: NaiveDate) -> Result<()> {
        let next = match rotation {
            Rotation::NewDay => self.naming.day_path(date),
            Rotation::Segment(n) => self.naming.segment_path(self.current_day, n),
        };

        // Flush failures surface again on the next write; rotation goes on.
        let _ = self.writer.flush();
        let file = open_append(&next).map_err(|e| LogError::Rotate {
            path: next.clone(),
            source: e,
        })?;

        debug!("Rotating log {} -> {}", self.path.display(), next.display());
        self.writer = BufWriter::new(file);
        self.path = next;
        if rotation == Rotation::NewDay {
            self.current_day = date;
            self.line_count = 0;
        }
        Ok(())
    }

    fn record_error(&mut self, err: LogError, stats: &WriterStats) {
        warn!("{}", err);
        stats.add_error();
        self.last_error = Some(err.to_string());
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
