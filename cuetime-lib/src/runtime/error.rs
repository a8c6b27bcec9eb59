use thiserror::Error;

use crate::timer::TimerError;

use super::slots::TimerSlot;

/// Rejected runtime update or command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("timer slot {0} is not active")]
    InactiveTimerSlot(TimerSlot),

    #[error(transparent)]
    Timer(#[from] TimerError),
}
