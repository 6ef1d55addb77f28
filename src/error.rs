use thiserror::Error;

#[derive(Debug, Error)]
pub enum PillcheckError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub use crate::Result;
