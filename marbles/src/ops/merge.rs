use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{Notification, Observer, ObserverRef, Source, SourceRef, Subscription, Value};

/// Interleaves two sources into one stream.
///
/// `Next` records forward from both sides at their own ticks; same-tick
/// records keep subscription registration order. `Completed` forwards only
/// once both sides have completed. The first `Error` terminates the merged
/// stream and disposes both sides.
pub(crate) struct Merge<V: Value> {
    left: SourceRef<V>,
    right: SourceRef<V>,
}

impl<V: Value> Merge<V> {
    pub(crate) fn new(left: SourceRef<V>, right: SourceRef<V>) -> Self {
        Merge { left, right }
    }
}

struct Join {
    active: Cell<usize>,
    gate: Subscription,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<V: Value> Source<V> for Merge<V> {
    fn subscribe(&self, observer: ObserverRef<V>) -> Subscription {
        let join = Rc::new(Join {
            active: Cell::new(2),
            gate: Subscription::new(),
            subscriptions: RefCell::new(Vec::new()),
        });

        let left_sub = self.left.subscribe(Rc::new(JoinObserver {
            join: Rc::clone(&join),
            observer: observer.clone(),
        }));
        let right_sub = self.right.subscribe(Rc::new(JoinObserver {
            join: Rc::clone(&join),
            observer,
        }));

        *join.subscriptions.borrow_mut() = vec![left_sub.clone(), right_sub.clone()];

        Subscription::tied(vec![join.gate.clone(), left_sub, right_sub])
    }
}

struct JoinObserver<V: Value> {
    join: Rc<Join>,
    observer: ObserverRef<V>,
}

impl<V: Value> Observer<V> for JoinObserver<V> {
    fn on_event(&self, event: Notification<V>) {
        if self.join.gate.is_disposed() {
            return;
        }
        match event {
            Notification::Next(value) => self.observer.on_event(Notification::Next(value)),
            Notification::Error(e) => {
                self.observer.on_event(Notification::Error(e));
                self.join.gate.dispose();
                for sub in self.join.subscriptions.borrow().iter() {
                    sub.dispose();
                }
            }
            Notification::Completed => {
                let remaining = self.join.active.get().saturating_sub(1);
                self.join.active.set(remaining);
                if remaining == 0 {
                    self.observer.on_event(Notification::Completed);
                    self.join.gate.dispose();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{completed, error, next, SourceExt, TestScheduler};

    #[derive(Debug, thiserror::Error)]
    #[error("wire broke")]
    struct WireBroke;

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
    fn interleaves_by_tick() {
        let scheduler = TestScheduler::new(0).unwrap();
        let a = scheduler
            .create_hot_source(vec![next(100, "a1"), next(300, "a2")])
            .unwrap();
        let b = scheduler
            .create_hot_source(vec![next(200, "b1"), next(400, "b2")])
            .unwrap();

        let observer = subscribe_at_zero(&scheduler, a.merge(&b));
        scheduler.start().unwrap();

        assert_eq!(
            observer.events(),
            vec![
                next(100, "a1"),
                next(200, "b1"),
                next(300, "a2"),
                next(400, "b2")
            ]
        );
    }

    #[test]
    fn same_tick_records_keep_subscription_order() {
        let scheduler = TestScheduler::new(0).unwrap();
        let a = scheduler.create_hot_source(vec![next(100, "left")]).unwrap();
        let b = scheduler.create_hot_source(vec![next(100, "right")]).unwrap();

        let observer = subscribe_at_zero(&scheduler, a.merge(&b));
        scheduler.start().unwrap();

        assert_eq!(observer.values(), vec!["left", "right"]);
    }

    #[test]
    fn completes_only_after_both_sides_complete() {
        let scheduler = TestScheduler::new(0).unwrap();
        let a = scheduler
            .create_hot_source(vec![next(100, 1), completed(150)])
            .unwrap();
        let b = scheduler
            .create_hot_source(vec![next(200, 2), completed(250)])
            .unwrap();

        let observer = subscribe_at_zero(&scheduler, a.merge(&b));
        scheduler.start().unwrap();

        assert_eq!(
            observer.events(),
            vec![next(100, 1), next(200, 2), completed(250)]
        );
    }

    #[test]
    fn first_error_terminates_the_merged_stream() {
        let scheduler = TestScheduler::new(0).unwrap();
        let a = scheduler
            .create_hot_source(vec![next(100, 1), error(150, WireBroke)])
            .unwrap();
        let b = scheduler
            .create_hot_source(vec![next(120, 2), next(300, 3)])
            .unwrap();

        let observer = subscribe_at_zero(&scheduler, a.merge(&b));
        scheduler.start().unwrap();

        assert_eq!(
            observer.events(),
            vec![next(100, 1), next(120, 2), error(150, WireBroke)]
        );
    }
}
