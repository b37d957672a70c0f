use std::rc::Rc;

use crate::{
    Notification, Observer, ObserverRef, Source, SourceRef, StreamError, Subscription, Value,
};

type Predicate<V> = Rc<dyn Fn(&V) -> Result<bool, StreamError>>;

/// Forwards `Next` values that satisfy the predicate; terminals always
/// forward. Backs both `filter` and `try_filter`.
pub(crate) struct Filter<V: Value> {
    source: SourceRef<V>,
    predicate: Predicate<V>,
}

impl<V: Value> Filter<V> {
    pub(crate) fn new(source: SourceRef<V>, predicate: Predicate<V>) -> Self {
        Filter { source, predicate }
    }
}

impl<V: Value> Source<V> for Filter<V> {
    fn subscribe(&self, observer: ObserverRef<V>) -> Subscription {
        // The gate halts forwarding after a predicate failure without
        // touching the rest of the run.
        let gate = Subscription::new();
        let upstream = self.source.subscribe(Rc::new(FilterObserver {
            observer,
            predicate: Rc::clone(&self.predicate),
            gate: gate.clone(),
        }));
        Subscription::tied(vec![gate, upstream])
    }
}

struct FilterObserver<V: Value> {
    observer: ObserverRef<V>,
    predicate: Predicate<V>,
    gate: Subscription,
}

impl<V: Value> Observer<V> for FilterObserver<V> {
    fn on_event(&self, event: Notification<V>) {
        if self.gate.is_disposed() {
            return;
        }
        match event {
            Notification::Next(value) => match (self.predicate)(&value) {
                Ok(true) => self.observer.on_event(Notification::Next(value)),
                Ok(false) => {}
                Err(e) => {
                    self.observer.on_event(Notification::Error(e));
                    self.gate.dispose();
                }
            },
            terminal => {
                self.observer.on_event(terminal);
                self.gate.dispose();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{completed, error, next, SourceExt, TestScheduler};
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    #[error("bad value")]
    struct BadValue;

    fn subscribe_at_zero<V: Value>(
        scheduler: &TestScheduler,
        source: SourceRef<V>,
    ) -> Rc<crate::Recorder<V>> {
        let observer = scheduler.create_observer::<V>();
        let handle = Rc::clone(&observer);
        scheduler
            .schedule_at(0, move || {
                source.subscribe(handle);
            })
            .unwrap();
        observer
    }

    #[test]
    fn filter_keeps_matching_values_at_their_ticks() {
        let scheduler = TestScheduler::new(0).unwrap();
        let source = scheduler
            .create_hot_source(vec![
                next(100, 1),
                next(200, 2),
                next(300, 3),
                next(400, 2),
                next(500, 1),
            ])
            .unwrap();
        let observer = subscribe_at_zero(&scheduler, source.filter(|x| *x < 3));
        scheduler.start().unwrap();

        assert_eq!(observer.values(), vec![1, 2, 2, 1]);
        assert_eq!(
            observer.events(),
            vec![next(100, 1), next(200, 2), next(400, 2), next(500, 1)]
        );
    }

    #[test]
    fn always_true_filter_reproduces_input_exactly() {
        let scheduler = TestScheduler::new(0).unwrap();
        let script = vec![next(100, "x"), next(250, "y"), completed(300)];
        let source = scheduler.create_hot_source(script.clone()).unwrap();
        let observer = subscribe_at_zero(&scheduler, source.filter(|_| true));
        scheduler.start().unwrap();

        assert_eq!(observer.events(), script);
    }

    #[test]
    fn terminals_forward_unchanged() {
        let scheduler = TestScheduler::new(0).unwrap();
        let source = scheduler
            .create_hot_source(vec![next(100, 10), error(200, BadValue)])
            .unwrap();
        let observer = subscribe_at_zero(&scheduler, source.filter(|x| *x < 5));
        scheduler.start().unwrap();

        assert_eq!(observer.events(), vec![error(200, BadValue)]);
    }

    #[test]
    fn failing_predicate_becomes_error_record_and_halts_forwarding() {
        let scheduler = TestScheduler::new(0).unwrap();
        let source = scheduler
            .create_hot_source(vec![next(100, 1), next(200, 13), next(300, 2)])
            .unwrap();
        let filtered = source.try_filter(|x| {
            if *x == 13 {
                Err(Arc::new(BadValue) as StreamError)
            } else {
                Ok(true)
            }
        });
        let observer = subscribe_at_zero(&scheduler, filtered);
        scheduler.start().unwrap();

        // The record at 300 is suppressed; the scheduler itself kept going.
        assert_eq!(observer.events(), vec![next(100, 1), error(200, BadValue)]);
        assert_eq!(scheduler.now(), 300.into());
    }
}
