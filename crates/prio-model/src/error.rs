use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown rank set kind: {0}")]
    UnknownRankSet(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
