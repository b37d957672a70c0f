use std::{cell::RefCell, fmt, rc::Rc};

use crate::{scheduler::Core, Notification, Observer, Recorded, Value};

/// Observer that logs every received notification, stamped with the clock
/// value at receipt.
///
/// The receipt tick can differ from the tick a record was scripted at when
/// a pipeline stage delays it; the recorder always reports what the shared
/// virtual clock said when the notification arrived. Created via
/// [`TestScheduler::create_observer`](crate::TestScheduler::create_observer).
pub struct Recorder<V: Value> {
    core: Rc<RefCell<Core>>,
    log: RefCell<Vec<Recorded<V>>>,
}

impl<V: Value> Recorder<V> {
    pub(crate) fn new(core: Rc<RefCell<Core>>) -> Self {
        Recorder {
            core,
            log: RefCell::new(Vec::new()),
        }
    }

    /// The full ordered log of `(tick, notification)` pairs.
    pub fn events(&self) -> Vec<Recorded<V>> {
        self.log.borrow().clone()
    }

    /// Just the `Next` payloads, in order. Mirrors the usual assertion
    /// shape for value-only scripts.
    pub fn values(&self) -> Vec<V> {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| r.value.value().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl<V: Value> Observer<V> for Recorder<V> {
    fn on_event(&self, event: Notification<V>) {
        let tick = self.core.borrow().now();
        self.log.borrow_mut().push(Recorded::new(tick, event));
    }
}

impl<V: Value> fmt::Debug for Recorder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("events", &self.log.borrow().len())
            .finish()
    }
}
