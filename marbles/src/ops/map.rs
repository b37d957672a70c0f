use std::rc::Rc;

use crate::{
    Notification, Observer, ObserverRef, Source, SourceRef, StreamError, Subscription, Value,
};

type Transform<V, W> = Rc<dyn Fn(&V) -> Result<W, StreamError>>;

/// Transforms `Next` values; terminals and ticks pass through unchanged.
/// Backs both `map` and `try_map`.
pub(crate) struct Map<V: Value, W: Value> {
    source: SourceRef<V>,
    transform: Transform<V, W>,
}

impl<V: Value, W: Value> Map<V, W> {
    pub(crate) fn new(source: SourceRef<V>, transform: Transform<V, W>) -> Self {
        Map { source, transform }
    }
}

impl<V: Value, W: Value> Source<W> for Map<V, W> {
    fn subscribe(&self, observer: ObserverRef<W>) -> Subscription {
        let gate = Subscription::new();
        let upstream = self.source.subscribe(Rc::new(MapObserver {
            observer,
            transform: Rc::clone(&self.transform),
            gate: gate.clone(),
        }));
        Subscription::tied(vec![gate, upstream])
    }
}

struct MapObserver<V: Value, W: Value> {
    observer: ObserverRef<W>,
    transform: Transform<V, W>,
    gate: Subscription,
}

impl<V: Value, W: Value> Observer<V> for MapObserver<V, W> {
    fn on_event(&self, event: Notification<V>) {
        if self.gate.is_disposed() {
            return;
        }
        match event {
            Notification::Next(value) => match (self.transform)(&value) {
                Ok(mapped) => self.observer.on_event(Notification::Next(mapped)),
                Err(e) => {
                    self.observer.on_event(Notification::Error(e));
                    self.gate.dispose();
                }
            },
            Notification::Error(e) => {
                self.observer.on_event(Notification::Error(e));
                self.gate.dispose();
            }
            Notification::Completed => {
                self.observer.on_event(Notification::Completed);
                self.gate.dispose();
            }
        }
    }
}
