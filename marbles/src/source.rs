use std::rc::Rc;

use crate::{
    ops::{Amb, Filter, Map, Merge},
    ObserverRef, StreamError, Subscription, Value,
};

/// A producer of timestamped notifications.
///
/// This is the one seam of the crate: hot and cold replay sources,
/// pipeline stages, and any external collaborator (a view-model's derived
/// property, say) all implement it. The core assumes nothing about how a
/// source computes its notifications, only that deliveries respect the
/// shared virtual clock.
pub trait Source<V: Value> {
    /// Attaches an observer. Deliveries begin according to the source's own
    /// semantics; the returned [`Subscription`] stops them when disposed.
    fn subscribe(&self, observer: ObserverRef<V>) -> Subscription;
}

/// Shared handle to a dynamically typed source, the currency of the
/// combinator layer.
pub type SourceRef<V> = Rc<dyn Source<V>>;

/// Combinator methods available on every [`SourceRef`].
///
/// Each combinator wraps its input(s) in a new source; nothing runs until
/// the result is subscribed. Output ticks are always non-decreasing.
pub trait SourceExt<V: Value> {
    /// Forwards `Next(v)` iff `predicate(&v)`; terminals always forward.
    /// Ticks are unchanged.
    fn filter(&self, predicate: impl Fn(&V) -> bool + 'static) -> SourceRef<V>;

    /// Like [`filter`](Self::filter), but a failing predicate turns into an
    /// `Error` notification on that subscription and halts further
    /// forwarding there. The scheduler itself keeps running.
    fn try_filter(
        &self,
        predicate: impl Fn(&V) -> Result<bool, StreamError> + 'static,
    ) -> SourceRef<V>;

    /// Transforms each `Next` value; terminals and ticks are unchanged.
    fn map<W: Value>(&self, f: impl Fn(&V) -> W + 'static) -> SourceRef<W>;

    /// Like [`map`](Self::map), but a failing transform turns into an
    /// `Error` notification on that subscription.
    fn try_map<W: Value>(
        &self,
        f: impl Fn(&V) -> Result<W, StreamError> + 'static,
    ) -> SourceRef<W>;

    /// Races `self` against `other`: the side that notifies first wins and
    /// the loser is disposed immediately. A tie at the identical tick goes
    /// to `self`, which subscribes first.
    fn amb(&self, other: &SourceRef<V>) -> SourceRef<V>;

    /// Interleaves both sides. Completes once both have completed; the
    /// first `Error` terminates the merged stream and disposes both sides.
    fn merge(&self, other: &SourceRef<V>) -> SourceRef<V>;
}

impl<V: Value> SourceExt<V> for SourceRef<V> {
    fn filter(&self, predicate: impl Fn(&V) -> bool + 'static) -> SourceRef<V> {
        let predicate = move |v: &V| -> Result<bool, StreamError> { Ok(predicate(v)) };
        Rc::new(Filter::new(Rc::clone(self), Rc::new(predicate)))
    }

    fn try_filter(
        &self,
        predicate: impl Fn(&V) -> Result<bool, StreamError> + 'static,
    ) -> SourceRef<V> {
        Rc::new(Filter::new(Rc::clone(self), Rc::new(predicate)))
    }

    fn map<W: Value>(&self, f: impl Fn(&V) -> W + 'static) -> SourceRef<W> {
        let f = move |v: &V| -> Result<W, StreamError> { Ok(f(v)) };
        Rc::new(Map::new(Rc::clone(self), Rc::new(f)))
    }

    fn try_map<W: Value>(
        &self,
        f: impl Fn(&V) -> Result<W, StreamError> + 'static,
    ) -> SourceRef<W> {
        Rc::new(Map::new(Rc::clone(self), Rc::new(f)))
    }

    fn amb(&self, other: &SourceRef<V>) -> SourceRef<V> {
        Rc::new(Amb::new(Rc::clone(self), Rc::clone(other)))
    }

    fn merge(&self, other: &SourceRef<V>) -> SourceRef<V> {
        Rc::new(Merge::new(Rc::clone(self), Rc::clone(other)))
    }
}
