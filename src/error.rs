use thiserror::Error;

use crate::numeric::NumericKind;

/// Main error type for numtrie operations
#[derive(Error, Debug)]
pub enum NumtrieError {
    #[error("Invalid precision step {0}: must be at least 1")]
    InvalidPrecisionStep(u32),

    #[error("Numeric kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: NumericKind,
        actual: NumericKind,
    },

    #[error("Invalid prefix-coded term: {0}")]
    InvalidTerm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for numtrie operations
pub type Result<T> = std::result::Result<T, NumtrieError>;

impl NumtrieError {
    /// Check if this error indicates a transient failure that could be retried
    pub fn is_retriable(&self) -> bool {
        matches!(self, NumtrieError::Io(_))
    }
}
