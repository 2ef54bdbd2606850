//! Core error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! into one of their variants via `From` or wrap it.  Every error eventually
//! lands in one of three policy buckets (parse, routing, I/O); see
//! `lv_pipeline::ErrorKind`.

use thiserror::Error;

/// The error type for `lv-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `lv-core`.
pub type CoreResult<T> = Result<T, CoreError>;
