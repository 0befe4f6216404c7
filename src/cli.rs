//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{Parser, Subcommand};
use daylog::{LogConfig, LogLevel};
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Write day- and line-rotated log files
#[derive(Parser, Debug)]
#[command(name = "daylog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ./daylog.toml if present)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    pub path: Option<PathBuf>,

    /// Write through the background flush thread (overrides config)
    #[arg(long = "async", global = true)]
    pub is_async: bool,

    /// Lines per file segment (overrides config)
    #[arg(long, value_name = "N", global = true)]
    pub split_lines: Option<u64>,

    /// Maximum line length in bytes (overrides config)
    #[arg(long, value_name = "BYTES", global = true)]
    pub buf_size: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one line
    Write {
        #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
        level: LogLevel,

        /// Message words, joined with spaces
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Write every stdin line until EOF or Ctrl-C
    Pipe {
        #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
        level: LogLevel,

        /// Print the writer status as JSON on exit
        #[arg(long)]
        status: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut LogConfig) {
        if let Some(path) = &self.path {
            config.path = path.clone();
        }
        if self.is_async {
            config.is_async = true;
        }
        if let Some(split_lines) = self.split_lines {
            config.split_lines = split_lines;
        }
        if let Some(buf_size) = self.buf_size {
            config.buf_size = buf_size;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
