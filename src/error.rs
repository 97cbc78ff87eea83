//! Error types for the ecosystem.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EcoError>;

#[derive(Error, Debug)]
pub enum EcoError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Raised when a cycle pass breaks an engine contract. The cycle is rolled back.
    #[error("corrupt state: {0}")]
    CorruptState(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EcoError {
    fn from(err: serde_json::Error) -> Self {
        EcoError::Serialization(err.to_string())
    }
}
