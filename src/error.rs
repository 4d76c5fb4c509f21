//! Error types for the Ledgergrid application

use thiserror::Error;

use crate::logging::LoggingError;
use ledgergrid_core::GridError;

/// Errors that can occur in the Ledgergrid application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Sheet error: {0}")]
    Sheet(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

pub type Result<T> = std::result::Result<T, AppError>;
