//! Network error type.

use thiserror::Error;

use lv_core::NodeId;

/// Errors produced by `lv-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// No path under the requested cost function.  Callers in the baseline
    /// estimator treat this as a routing failure, never as fatal.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("link `{link}` references unknown node `{node}`")]
    UnknownNode { link: String, node: String },

    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),

    #[error("invalid network record: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
