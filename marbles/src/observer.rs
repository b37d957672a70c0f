use std::rc::Rc;

use crate::{Notification, Value};

/// Sink for notifications delivered by a [`Source`](crate::Source).
///
/// Implementations use interior mutability; the whole virtual-time core is
/// single-threaded by design, so `Rc`/`RefCell` are the right tools and the
/// types are deliberately `!Send`.
pub trait Observer<V: Value> {
    /// Called once per delivered notification, at the notification's
    /// effective tick. The current virtual time is readable from the
    /// scheduler that drives the delivery.
    fn on_event(&self, event: Notification<V>);
}

/// Shared handle to a dynamically typed observer.
pub type ObserverRef<V> = Rc<dyn Observer<V>>;
