use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error(transparent)]
    Config(#[from] lv_core::CoreError),
}

pub type BaselineResult<T> = Result<T, BaselineError>;
