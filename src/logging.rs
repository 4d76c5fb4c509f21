//! Tracing subscriber initialization.
//!
//! The terminal belongs to the grid, so logs go to a file. Watch them with
//! `tail -f` in another terminal.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Where logs go when neither the CLI nor the config names a file.
pub fn default_log_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "ledgergrid")?;
    Some(proj.data_local_dir().join("ledgergrid.log"))
}

/// Initialize the tracing subscriber with file-based logging.
///
/// `RUST_LOG` wins over `default_level`.
pub fn init(log_path: &Path, default_level: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|_| LoggingError::InvalidFilter(default_level.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
