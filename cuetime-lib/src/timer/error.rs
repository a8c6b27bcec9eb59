use thiserror::Error;

/// Rejected timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("invalid duration: {0} ms is negative")]
    InvalidDuration(i64),

    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
}
