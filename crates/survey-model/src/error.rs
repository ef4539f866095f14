use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown element type: {0}")]
    UnknownElementType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
