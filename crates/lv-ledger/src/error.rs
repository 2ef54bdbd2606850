//! Error types for lv-ledger.

use thiserror::Error;

/// Errors that can occur when building or persisting ledger tables.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("column `{0}` already exists in the ledger")]
    DuplicateColumn(String),

    #[error("ledger header must start with `person`, found `{0}`")]
    BadHeader(String),

    #[error("table `{table}`: row has {got} cells, header has {expected}")]
    RowWidth { table: String, expected: usize, got: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, LedgerError>`.
pub type LedgerResult<T> = Result<T, LedgerError>;
