//! Indicator error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error(transparent)]
    Config(#[from] lv_core::CoreError),

    #[error(transparent)]
    Baseline(#[from] lv_baseline::BaselineError),
}

pub type IndicatorResult<T> = Result<T, IndicatorError>;
