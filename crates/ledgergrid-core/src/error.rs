//! Error types for the grid core.

use thiserror::Error;

/// Errors raised when a caller addresses the grid with something it does not have.
///
/// Bad cell input is never an error: numeric parse failures are coerced to
/// zero and out-of-range numbers are clamped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid has no columns")]
    NoColumns,

    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {index} out of range ({len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    #[error("Row {index} out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, GridError>;
