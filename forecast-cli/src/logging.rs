//! Tracing subscriber setup.
//!
//! One-shot commands log to stderr. The interactive screen owns the terminal,
//! so it logs to a file under the data directory instead.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_NAME: &str = "forecast.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Install the global subscriber.
///
/// The returned guard must be held for the life of the program when logging
/// to a file, or buffered lines are lost.
pub fn init(target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = build_env_filter();

    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
            Ok(None)
        }
        LogTarget::File => {
            let dir = log_directory()?;
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
            tracing::info!("logging to {}", dir.join(LOG_FILE_NAME).display());
            Ok(Some(guard))
        }
    }
}

fn log_directory() -> Result<PathBuf> {
    let dir = forecast_core::config::data_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    Ok(dir)
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}
