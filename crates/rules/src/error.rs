use thiserror::Error;

use claimsift_core::BatchError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("column '{0}' not present in batch")]
    MissingColumn(String),

    #[error("batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("rule failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
