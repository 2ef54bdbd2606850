use std::path::PathBuf;

use lv_baseline::BaselineError;
use lv_core::CoreError;
use lv_indicators::IndicatorError;
use lv_ledger::LedgerError;
use lv_network::NetworkError;
use lv_records::RecordError;
use thiserror::Error;

/// The three handling policies every failure falls under, plus
/// configuration mistakes.
///
/// | Kind      | Policy                                               |
/// |-----------|------------------------------------------------------|
/// | `Parse`   | bad record: skipped and counted while loading        |
/// | `Routing` | no path: fallback baseline, counted, run continues   |
/// | `Io`      | unreadable input or unwritable output: run aborts    |
/// | `Config`  | invalid configuration or pipeline setup: run aborts  |
///
/// Only errors that abort the run reach [`PipelineError`]; parse and
/// routing problems on single records are handled where they occur.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Routing,
    Io,
    Config,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(String),

    #[error("no {what} export found in {dir}")]
    MissingInput { what: &'static str, dir: PathBuf },

    #[error("no `indexValue_` columns in the ledger; run indicator modules before the summary")]
    NoIndexColumns,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Records(#[from] RecordError),

    #[error(transparent)]
    Baseline(#[from] BaselineError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

fn core_kind(e: &CoreError) -> ErrorKind {
    match e {
        CoreError::Parse(_) => ErrorKind::Parse,
        CoreError::Config(_) => ErrorKind::Config,
        CoreError::Io(_) => ErrorKind::Io,
    }
}

fn csv_kind(e: &csv::Error) -> ErrorKind {
    if e.is_io_error() { ErrorKind::Io } else { ErrorKind::Parse }
}

impl PipelineError {
    /// Which handling policy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Config(_) | PipelineError::NoIndexColumns => ErrorKind::Config,
            PipelineError::MissingInput { .. } => ErrorKind::Io,
            PipelineError::Core(e) => core_kind(e),
            PipelineError::Network(e) => match e {
                NetworkError::NoRoute { .. } => ErrorKind::Routing,
                NetworkError::UnknownNode { .. }
                | NetworkError::DuplicateNode(_)
                | NetworkError::Parse(_) => ErrorKind::Parse,
                NetworkError::Csv(e) => csv_kind(e),
                NetworkError::Io(_) => ErrorKind::Io,
            },
            PipelineError::Records(e) => match e {
                RecordError::Open { .. } | RecordError::Io(_) => ErrorKind::Io,
                RecordError::MissingColumn { .. } => ErrorKind::Parse,
                RecordError::Csv(e) => csv_kind(e),
            },
            PipelineError::Baseline(BaselineError::Config(e)) => core_kind(e),
            PipelineError::Indicator(e) => match e {
                IndicatorError::Config(e) | IndicatorError::Baseline(BaselineError::Config(e)) => core_kind(e),
            },
            PipelineError::Ledger(e) => match e {
                LedgerError::DuplicateColumn(_) | LedgerError::RowWidth { .. } => ErrorKind::Config,
                LedgerError::BadHeader(_) => ErrorKind::Parse,
                LedgerError::Csv(e) => csv_kind(e),
                _ => ErrorKind::Io,
            },
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
