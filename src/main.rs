//! daylog - write rotating log files from the command line
//!
//! Usage:
//!   daylog write [--level L] MESSAGE...   Write one line
//!   daylog pipe [--level L] [--status]    Write each stdin line until EOF or Ctrl-C
//!   daylog config                         Print the effective config

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use daylog::{config, logging, LogLevel, LogWriter};
use std::future::Future;
use tokio::io::{AsyncBufReadExt, BufReader};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => config::load(path)?,
        None => config::load_default(),
    };
    cli.apply_overrides(&mut cfg.log);

    match &cli.command {
        Command::Config => {
            print!("{}", config::to_toml(&cfg)?);
            Ok(())
        }
        Command::Write { level, message } => {
            let writer = LogWriter::init(&cfg.log)
                .with_context(|| format!("cannot start logging to {}", cfg.log.path.display()))?;
            writer.write_log(*level, format_args!("{}", message.join(" ")));
            writer.close();
            report_error(&writer);
            Ok(())
        }
        Command::Pipe { level, status } => {
            let writer = LogWriter::init(&cfg.log)
                .with_context(|| format!("cannot start logging to {}", cfg.log.path.display()))?;

            run_detached(pipe_stdin(&writer, *level))??;

            writer.close();
            report_error(&writer);
            if *status {
                println!("{}", serde_json::to_string_pretty(&writer.status())?);
            }
            Ok(())
        }
    }
}

/// Run `fut` to completion on a fresh runtime, then drop the runtime
/// without waiting for its blocking pool.
///
/// Tokio reads stdin on a blocking thread that cannot be cancelled, so a
/// plain drop would hang until the next input line after a signal.
fn run_detached<F: Future>(fut: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("failed to create runtime")?;
    let output = rt.block_on(fut);
    rt.shutdown_background();
    Ok(output)
}

/// Forward stdin lines to the writer until EOF, SIGINT or SIGTERM
async fn pipe_stdin(writer: &LogWriter, level: LogLevel) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("Shutdown signal received");
                break;
            }
            line = lines.next_line() => match line.context("failed to read stdin")? {
                Some(line) => writer.write_log(level, format_args!("{}", line)),
                None => break,
            },
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut sigterm), Ok(mut sigint)) = (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) else {
        tracing::warn!("Cannot install signal handlers, stopping on EOF only");
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv() => {},
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn report_error(writer: &LogWriter) {
    if let Some(err) = writer.last_error() {
        eprintln!("daylog: {}", err);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_run_detached_does_not_wait_for_blocking_reads() {
        let start = Instant::now();
        let value = run_detached(async {
            // Stands in for a stdin read that never completes
            let _stuck = tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(30)));
            7
        })
        .unwrap();

        assert_eq!(value, 7);
        assert!(start.elapsed() < Duration::from_secs(5), "runtime drop blocked");
    }
}
