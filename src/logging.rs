//! Tracing setup.
//!
//! The TUI owns stdout, so interactive runs log to a daily rolling file; the
//! one-shot subcommands log to stderr. The filter comes from `LOAD_DASH_LOG`
//! (e.g. `LOAD_DASH_LOG=load_dash=debug`) and defaults to `info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{AppError, EXIT_RUNTIME};

pub const LOG_ENV: &str = "LOAD_DASH_LOG";

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    Stderr,
    /// Daily rolling files named `load-dash.log.<date>` in this directory.
    File(&'a Path),
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the duration of the program; dropping it
/// flushes buffered file output.
pub fn init_logging(target: LogTarget<'_>) -> Result<Option<WorkerGuard>, AppError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init()
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize logging: {e}")))?;
            Ok(None)
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::new(EXIT_RUNTIME, format!("Failed to create log dir '{}': {e}", dir.display()))
            })?;
            let appender = tracing_appender::rolling::daily(dir, "load-dash.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize logging: {e}")))?;
            Ok(Some(guard))
        }
    }
}
