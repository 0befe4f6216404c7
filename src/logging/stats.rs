//! Writer counters
//!
//! Thread-safe counters shared by producers and the flush thread.
//! Uses lock-free atomics for all operations.

use super::LogLevel;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime counters of one writer (fully lock-free)
#[derive(Debug, Default)]
pub struct WriterStats {
    /// Lines written to a file
    lines_written: AtomicU64,
    /// Lines handed to the async queue
    lines_queued: AtomicU64,
    /// Successful rotations (day or segment)
    rotations: AtomicU64,
    /// Failed writes, flushes or rotations
    errors: AtomicU64,
    /// Lines written, indexed by level
    by_level: [AtomicU64; 4],
}

/// Point-in-time copy of [`WriterStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub lines_written: u64,
    pub lines_queued: u64,
    pub rotations: u64,
    pub errors: u64,
    pub by_level: LevelCounts,
}

/// Written lines per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub debug: u64,
    pub info: u64,
    pub warn: u64,
    pub error: u64,
}

impl WriterStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_written(&self, level: LogLevel) {
        self.lines_written.fetch_add(1, Ordering::Relaxed);
        self.by_level[level as usize].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_queued(&self) {
        self.lines_queued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_written: self.lines_written.load(Ordering::Relaxed),
            lines_queued: self.lines_queued.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            by_level: LevelCounts {
                debug: self.level(LogLevel::Debug),
                info: self.level(LogLevel::Info),
                warn: self.level(LogLevel::Warn),
                error: self.level(LogLevel::Error),
            },
        }
    }

    fn level(&self, level: LogLevel) -> u64 {
        self.by_level[level as usize].load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters_from_many_threads() {
        let stats = Arc::new(WriterStats::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let stats = stats.clone();
                let level = if i % 2 == 0 { LogLevel::Info } else { LogLevel::Error };
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.add_queued();
                        stats.add_written(level);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        stats.add_rotation();
        stats.add_error();

        let snap = stats.snapshot();
        assert_eq!(snap.lines_queued, 800);
        assert_eq!(snap.lines_written, 800);
        assert_eq!(snap.rotations, 1);
        assert_eq!(snap.errors, 1);
        assert_eq!(
            snap.by_level,
            LevelCounts {
                debug: 0,
                info: 400,
                warn: 0,
                error: 400,
            }
        );
    }
}
