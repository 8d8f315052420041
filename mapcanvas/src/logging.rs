//! Logging setup.
//!
//! Events go to two places:
//! - a log file in the configured directory, at the `EnvFilter` level
//!   (`info` by default, `debug` when verbose, `RUST_LOG` overrides both)
//! - stderr, for warnings and errors only unless verbose
//!
//! The file writer is non-blocking; keep the returned [`LoggingGuard`] alive
//! for the life of the program so buffered lines are flushed on exit.

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "mapcanvas.log";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Keeps the background log writer alive.
pub struct LoggingGuard {
    _worker: WorkerGuard,
    log_file: PathBuf,
}

impl LoggingGuard {
    /// Path of the file receiving log output.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber.
pub fn init_logging(
    log_dir: &Path,
    file_name: &str,
    verbose: bool,
) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDirectory {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let appender = tracing_appender::rolling::never(log_dir, file_name);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    // The local offset cannot always be determined (e.g. in multi-threaded
    // processes on some platforms); fall back to UTC.
    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_timer(timer.clone())
        .with_ansi(false)
        .with_target(true);

    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer)
        .with_target(false)
        .compact()
        .with_filter(stderr_level);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard {
        _worker: worker,
        log_file: log_dir.join(file_name),
    })
}
