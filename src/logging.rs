//! Tracing setup for the `lanescope` binary.
//!
//! Two sinks are installed. The console layer writes to stderr so stdout stays
//! free for reports and `--json` snapshots; its filter comes from
//! `LANESCOPE_LOG` or the chosen [`ConsoleVerbosity`]. The file layer always
//! records session and backend traffic at debug level into one file per run
//! under the app `logs/` directory.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use thiserror::Error;
use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

/// Environment variable holding console filter directives.
pub const LOG_ENV: &str = "LANESCOPE_LOG";

/// Run logs kept in the logs directory, the current one included.
const RETAINED_RUNS: usize = 10;
const RUN_LOG_PREFIX: &str = "lanescope-";
const RUN_LOG_SUFFIX: &str = ".log";
const FILE_DIRECTIVES: &str = "warn,lanescope=info,lanescope::session=debug,lanescope::backend=debug";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    #[error("Failed to open run log {path}: {source}")]
    OpenRunLog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to prune old run logs in {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to name run log: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// How chatty the console layer is when `LANESCOPE_LOG` is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleVerbosity {
    /// Progress of uploads and metadata fetches.
    #[default]
    Normal,
    /// Errors only; used when stdout carries machine-readable output.
    Quiet,
}

impl ConsoleVerbosity {
    fn directives(self) -> &'static str {
        match self {
            ConsoleVerbosity::Normal => "warn,lanescope=info",
            ConsoleVerbosity::Quiet => "error",
        }
    }
}

/// Install the global subscriber and return the path of this run's log.
///
/// A second call returns `Ok(None)` without touching the subscriber.
pub fn init(verbosity: ConsoleVerbosity) -> Result<Option<PathBuf>, LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }

    let log_dir = app_dirs::logs_dir()?;
    let file_name = run_log_name(OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()))?;
    let log_path = log_dir.join(&file_name);
    // Surface permission problems here rather than inside the appender thread.
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|source| LoggingError::OpenRunLog {
            path: log_path.clone(),
            source,
        })?;
    let removed = prune_run_logs(&log_dir, RETAINED_RUNS)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(&log_dir, &file_name));
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        TIMESTAMP_FORMAT,
    );
    let console_layer = fmt::layer()
        .with_target(false)
        .with_timer(timer.clone())
        .with_writer(std::io::stderr)
        .with_filter(console_filter(verbosity));
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new(FILE_DIRECTIVES));

    tracing::subscriber::set_global_default(
        Registry::default().with(console_layer).with(file_layer),
    )?;
    let _ = LOG_GUARD.set(guard);

    tracing::debug!(
        "Run log at {}; pruned {removed} older run logs",
        log_path.display()
    );
    Ok(Some(log_path))
}

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn console_filter(verbosity: ConsoleVerbosity) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(verbosity.directives()))
}

fn run_log_name(started: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP: &[BorrowedFormatItem<'_>] =
        format_description!("[year][month][day]T[hour][minute][second]");
    Ok(format!(
        "{RUN_LOG_PREFIX}{}{RUN_LOG_SUFFIX}",
        started.format(STAMP)?
    ))
}

fn is_run_log(name: &str) -> bool {
    name.starts_with(RUN_LOG_PREFIX) && name.ends_with(RUN_LOG_SUFFIX)
}

/// Delete the oldest run logs so at most `keep` remain.
///
/// Run log names embed a sortable timestamp, so name order is age order.
/// Other files in the directory are never touched.
fn prune_run_logs(dir: &Path, keep: usize) -> Result<usize, LoggingError> {
    let prune_error = |source| LoggingError::Prune {
        path: dir.to_path_buf(),
        source,
    };
    let mut runs: Vec<String> = fs::read_dir(dir)
        .map_err(prune_error)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_run_log(name))
        .collect();
    runs.sort();
    let excess = runs.len().saturating_sub(keep);
    for name in &runs[..excess] {
        fs::remove_file(dir.join(name)).map_err(prune_error)?;
    }
    Ok(excess)
}
