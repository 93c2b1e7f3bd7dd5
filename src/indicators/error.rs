use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("insufficient history: {actual} bars, need at least {required}")]
    InsufficientHistory { required: usize, actual: usize },
}
