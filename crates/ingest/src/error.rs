use thiserror::Error;

/// Errors raised while moving claim worksheets in and out of files.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' could not be encoded: {reason}")]
    Encode { column: String, reason: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
