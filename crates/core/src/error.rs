use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("column '{column}' has {got} values, batch has {expected} rows")]
    LengthMismatch {
        column: String,
        got: usize,
        expected: usize,
    },
}
