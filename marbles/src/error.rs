use std::sync::Arc;

use crate::Tick;

/// The single error type for all Marbles operations.
///
/// Every fallible Marbles API returns `marbles::Result<T>` (alias for
/// `Result<T, marbles::Error>`). Configuration errors (bad schedules,
/// malformed scripts) surface here synchronously; runtime errors during
/// replay are captured as `Error` notifications in the affected
/// subscription's log instead and never cross the scheduler loop.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("cannot schedule at negative tick {0}")]
    InvalidSchedule(Tick),

    #[error("scheduler has already run")]
    AlreadyRunning,

    #[error("cannot schedule at tick {requested}, clock is already at {now}")]
    PastScheduling { requested: Tick, now: Tick },

    #[error("event at index {index} has negative tick {tick}")]
    NegativeSequenceTick { index: usize, tick: Tick },

    #[error("event at index {index} has tick {found} earlier than preceding tick {prev}")]
    NonMonotonicSequence { index: usize, prev: Tick, found: Tick },

    #[error("terminal event at index {index} is not the last element")]
    TerminalNotLast { index: usize },

    #[error("consumer error: {0}")]
    Consumer(#[source] Arc<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),

    #[cfg(feature = "realtime")]
    #[error("no terminal event within {0:?}: {1} values drained")]
    DrainTimeout(std::time::Duration, usize),
}

impl Error {
    pub fn consumer(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Consumer(Arc::new(e))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidSchedule(a), Self::InvalidSchedule(b)) => a == b,
            (Self::AlreadyRunning, Self::AlreadyRunning) => true,
            (
                Self::PastScheduling { requested: a1, now: a2 },
                Self::PastScheduling { requested: b1, now: b2 },
            ) => a1 == b1 && a2 == b2,
            (
                Self::NegativeSequenceTick { index: a1, tick: a2 },
                Self::NegativeSequenceTick { index: b1, tick: b2 },
            ) => a1 == b1 && a2 == b2,
            (
                Self::NonMonotonicSequence { index: a1, prev: a2, found: a3 },
                Self::NonMonotonicSequence { index: b1, prev: b2, found: b3 },
            ) => a1 == b1 && a2 == b2 && a3 == b3,
            (Self::TerminalNotLast { index: a }, Self::TerminalNotLast { index: b }) => a == b,
            (Self::Consumer(a), Self::Consumer(b)) => Arc::ptr_eq(a, b),
            (Self::Io(a), Self::Io(b)) => Arc::ptr_eq(a, b),
            #[cfg(feature = "realtime")]
            (Self::DrainTimeout(a1, a2), Self::DrainTimeout(b1, b2)) => a1 == b1 && a2 == b2,
            _ => false,
        }
    }
}

impl Eq for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(Arc::new(e))
    }
}
