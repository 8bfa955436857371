use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("corpus does not contain any vectors")]
    EmptyCorpus,
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("table index {index} out of range for {tables} tables")]
    IndexOutOfRange { index: usize, tables: usize },
    #[error("unsupported similarity metric: {0}")]
    UnsupportedMetric(String),
    #[error("result sets differ in size: expected {expected}, got {got}")]
    SizeMismatch { expected: usize, got: usize },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
