use std::{fmt, sync::Arc};

use crate::Tick;

/// Marker trait for values carried through event streams.
///
/// Implemented automatically for any `Clone + Debug + 'static` type, so
/// test scripts can emit `&str`, integers, tuples, or domain enums without
/// ceremony.
pub trait Value: Clone + fmt::Debug + 'static {}

impl<T: Clone + fmt::Debug + 'static> Value for T {}

/// Error payload carried by an [`Notification::Error`] record.
///
/// `Arc`-wrapped so notifications stay cheaply cloneable while the payload
/// can be any error type.
pub type StreamError = Arc<dyn std::error::Error + Send + Sync>;

/// One occurrence in an event stream: a value, a failure, or completion.
///
/// `Error` and `Completed` are terminal: nothing follows them on the same
/// subscription.
#[derive(Clone)]
pub enum Notification<V> {
    Next(V),
    Error(StreamError),
    Completed,
}

impl<V> Notification<V> {
    /// True for `Error` and `Completed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Notification::Next(_))
    }

    /// The carried value, if this is a `Next`.
    pub fn value(&self) -> Option<&V> {
        match self {
            Notification::Next(v) => Some(v),
            _ => None,
        }
    }
}

// Error notifications compare by display text. Expected logs in tests are
// written as literals, so pointer identity would make them impossible to
// state; the rendered message is the contract being asserted.
impl<V: PartialEq> PartialEq for Notification<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Notification::Next(a), Notification::Next(b)) => a == b,
            (Notification::Error(a), Notification::Error(b)) => a.to_string() == b.to_string(),
            (Notification::Completed, Notification::Completed) => true,
            _ => false,
        }
    }
}

impl<V: Eq> Eq for Notification<V> {}

impl<V: fmt::Debug> fmt::Debug for Notification<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Next(v) => write!(f, "Next({v:?})"),
            Notification::Error(e) => write!(f, "Error({e})"),
            Notification::Completed => write!(f, "Completed"),
        }
    }
}

/// A [`Notification`] stamped with the virtual time it occurs.
///
/// In a source script the tick is when the record is scripted to fire; in a
/// recorder log it is the clock value at receipt. The two can differ when a
/// pipeline stage delays a record.
#[derive(Clone, PartialEq, Eq)]
pub struct Recorded<V> {
    pub tick: Tick,
    pub value: Notification<V>,
}

impl<V> Recorded<V> {
    pub fn new(tick: impl Into<Tick>, value: Notification<V>) -> Self {
        Recorded { tick: tick.into(), value }
    }
}

impl<V: fmt::Debug> fmt::Debug for Recorded<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.tick, self.value)
    }
}

/// Scripts a value emission at `tick`.
pub fn next<V>(tick: impl Into<Tick>, value: V) -> Recorded<V> {
    Recorded::new(tick, Notification::Next(value))
}

/// Scripts a terminal error at `tick`.
pub fn error<V>(tick: impl Into<Tick>, err: impl std::error::Error + Send + Sync + 'static) -> Recorded<V> {
    Recorded::new(tick, Notification::Error(Arc::new(err)))
}

/// Scripts stream completion at `tick`.
pub fn completed<V>(tick: impl Into<Tick>) -> Recorded<V> {
    Recorded::new(tick, Notification::Completed)
}
