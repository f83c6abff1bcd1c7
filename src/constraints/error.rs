use thiserror::Error;

/// Errors that can occur while reading a comparison operator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseComparisonError {
    #[error("Unknown comparison operator: {0:?}")]
    UnknownOperator(String),
}
