use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("instance parse error: {0}")]
    Parse(String),

    #[error("invalid instance: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
