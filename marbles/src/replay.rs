use std::{cell::RefCell, rc::Rc};

use crate::{
    scheduler::Core, EventSequence, Notification, ObserverRef, Source, Subscription, Tick, Value,
};

/// Replays a script at absolute ticks; late joiners miss earlier records.
///
/// Records scripted strictly before the attach tick are dropped, modeling
/// real pub/sub where past broadcasts are unrecoverable. The drop is a
/// documented semantic, not an error; it is logged at trace level. A record
/// scripted exactly at the attach tick is still delivered (same-tick
/// append).
pub struct HotSource<V: Value> {
    core: Rc<RefCell<Core>>,
    script: EventSequence<V>,
}

impl<V: Value> HotSource<V> {
    pub(crate) fn new(core: Rc<RefCell<Core>>, script: EventSequence<V>) -> Self {
        HotSource { core, script }
    }
}

impl<V: Value> Source<V> for HotSource<V> {
    fn subscribe(&self, observer: ObserverRef<V>) -> Subscription {
        let subscription = Subscription::new();
        let attach = self.core.borrow().now();
        for record in &self.script {
            if record.tick < attach {
                tracing::trace!(
                    scripted = %record.tick,
                    attach = %attach,
                    "dropping pre-attach hot record"
                );
                continue;
            }
            schedule_delivery(
                &self.core,
                record.tick,
                observer.clone(),
                subscription.clone(),
                record.value.clone(),
            );
        }
        subscription
    }
}

/// Replays a script re-based to the attach tick ("replay from start").
///
/// Each record's scripted tick is treated as an offset: a record at offset
/// 30 subscribed at tick 200 fires at tick 230, so the log's offsets from
/// attach time always equal the script's offsets from zero.
pub struct ColdSource<V: Value> {
    core: Rc<RefCell<Core>>,
    script: EventSequence<V>,
}

impl<V: Value> ColdSource<V> {
    pub(crate) fn new(core: Rc<RefCell<Core>>, script: EventSequence<V>) -> Self {
        ColdSource { core, script }
    }
}

impl<V: Value> Source<V> for ColdSource<V> {
    fn subscribe(&self, observer: ObserverRef<V>) -> Subscription {
        let subscription = Subscription::new();
        let attach = self.core.borrow().now();
        for record in &self.script {
            schedule_delivery(
                &self.core,
                record.tick.rebase(attach),
                observer.clone(),
                subscription.clone(),
                record.value.clone(),
            );
        }
        subscription
    }
}

// Emission is itself a scheduled action, so replay timing is driven
// entirely by the shared clock and interleaves deterministically with
// every other source and stage in the run.
fn schedule_delivery<V: Value>(
    core: &Rc<RefCell<Core>>,
    tick: Tick,
    observer: ObserverRef<V>,
    subscription: Subscription,
    event: Notification<V>,
) {
    core.borrow_mut().push(
        tick,
        Box::new(move || {
            if subscription.is_disposed() {
                return;
            }
            let terminal = event.is_terminal();
            observer.on_event(event);
            if terminal {
                subscription.dispose();
            }
        }),
    );
}
