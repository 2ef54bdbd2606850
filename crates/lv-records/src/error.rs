//! Record-loading error type.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors while reading an export.  Row-level parse failures are not
/// errors; they are skipped and counted.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("cannot open {path}: {source}")]
    Open {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} export is missing required column `{column}`")]
    MissingColumn { what: &'static str, column: &'static str },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RecordResult<T> = Result<T, RecordError>;
