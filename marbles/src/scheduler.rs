use std::{
    cell::RefCell,
    cmp::Reverse,
    collections::BinaryHeap,
    fmt,
    rc::Rc,
};

use crate::{
    clock::VirtualClock,
    replay::{ColdSource, HotSource},
    Error, EventSequence, Recorded, Recorder, Result, SourceRef, Subscription, Tick, Value,
};

type Action = Box<dyn FnOnce()>;

struct Pending {
    tick: Tick,
    seq: u64,
    action: Action,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.tick, self.seq).cmp(&(other.tick, other.seq))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Finished,
}

/// Clock plus pending-action queue, shared behind `Rc<RefCell<_>>` by the
/// scheduler, its sources, and its recorders. Ties at a tick break by
/// registration order (`seq`).
pub(crate) struct Core {
    clock: VirtualClock,
    queue: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
    state: RunState,
}

impl Core {
    fn new(initial: Tick) -> Self {
        Core {
            clock: VirtualClock::new(initial),
            queue: BinaryHeap::new(),
            next_seq: 0,
            state: RunState::Idle,
        }
    }

    pub(crate) fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Registers an action unconditionally. Callers validate the tick; the
    /// replay sources use this directly because their effective ticks are
    /// never in the past by construction.
    pub(crate) fn push(&mut self, tick: Tick, action: Action) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Pending { tick, seq, action }));
    }

    fn pop_due(&mut self, ceiling: Option<Tick>) -> Option<Pending> {
        let due = match self.queue.peek() {
            Some(Reverse(p)) => ceiling.map_or(true, |c| p.tick <= c),
            None => false,
        };
        if !due {
            return None;
        }
        self.queue.pop().map(|Reverse(p)| {
            self.clock.advance_to(p.tick);
            p
        })
    }
}

/// Deterministic virtual-time scheduler: one instance per test, run once.
///
/// Test code registers sources and scheduled actions at specific ticks,
/// calls [`start`](Self::start), then asserts on recorder logs. All
/// "concurrency" is simulated by interleaving actions at shared ticks;
/// actions at the same tick run in registration order.
///
/// Clones are handles onto the same clock and queue.
///
/// # Example
///
/// ```rust
/// use marbles::{next, SourceExt, TestScheduler};
///
/// fn main() -> marbles::Result {
///     let scheduler = TestScheduler::new(0)?;
///     let observer = scheduler.create_observer::<i32>();
///
///     let source = scheduler.create_hot_source(vec![
///         next(100, 1),
///         next(200, 2),
///         next(300, 3),
///         next(400, 2),
///         next(500, 1),
///     ])?;
///
///     let filtered = source.filter(|x| *x < 3);
///     let recorder = observer.clone();
///     scheduler.schedule_at(0, move || {
///         filtered.subscribe(recorder);
///     })?;
///     scheduler.start()?;
///
///     assert_eq!(observer.values(), vec![1, 2, 2, 1]);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TestScheduler {
    core: Rc<RefCell<Core>>,
}

impl TestScheduler {
    /// Creates a scheduler with the clock at `initial`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchedule`] if `initial` is negative.
    pub fn new(initial: impl Into<Tick>) -> Result<Self> {
        let initial = initial.into();
        if initial.is_negative() {
            return Err(Error::InvalidSchedule(initial));
        }
        Ok(TestScheduler {
            core: Rc::new(RefCell::new(Core::new(initial))),
        })
    }

    /// Current virtual time.
    pub fn now(&self) -> Tick {
        self.core.borrow().now()
    }

    /// Registers `action` to run when the clock reaches `tick`.
    ///
    /// Scheduling exactly at the current tick appends to the end of that
    /// tick's action list ("schedule now" semantics, used by
    /// attach-immediately setups).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSchedule`] if `tick` is negative
    /// - [`Error::PastScheduling`] if `tick` is strictly before the clock
    pub fn schedule_at(&self, tick: impl Into<Tick>, action: impl FnOnce() + 'static) -> Result {
        let tick = tick.into();
        if tick.is_negative() {
            return Err(Error::InvalidSchedule(tick));
        }
        let mut core = self.core.borrow_mut();
        let now = core.now();
        if tick < now {
            return Err(Error::PastScheduling { requested: tick, now });
        }
        core.push(tick, Box::new(action));
        Ok(())
    }

    /// Runs every pending action in tick order (registration order within a
    /// tick) until the queue is empty. The clock ends at the last executed
    /// tick.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`] on a second call; the domain model is one
    /// run per scheduler instance.
    pub fn start(&self) -> Result {
        self.run(None)
    }

    /// Like [`start`](Self::start), but stops at `ceiling`: actions
    /// scheduled after it stay pending and the clock ends exactly at the
    /// ceiling.
    pub fn start_until(&self, ceiling: impl Into<Tick>) -> Result {
        let ceiling = ceiling.into();
        if ceiling.is_negative() {
            return Err(Error::InvalidSchedule(ceiling));
        }
        let now = self.core.borrow().now();
        if ceiling < now {
            return Err(Error::PastScheduling { requested: ceiling, now });
        }
        self.run(Some(ceiling))
    }

    fn run(&self, ceiling: Option<Tick>) -> Result {
        {
            let mut core = self.core.borrow_mut();
            if core.state != RunState::Idle {
                return Err(Error::AlreadyRunning);
            }
            core.state = RunState::Running;
        }
        // Pop under a short borrow, run with no borrow held, so actions can
        // freely schedule further actions and subscribe sources.
        loop {
            let pending = self.core.borrow_mut().pop_due(ceiling);
            match pending {
                Some(p) => {
                    tracing::trace!(tick = %p.tick, seq = p.seq, "executing scheduled action");
                    (p.action)();
                }
                None => break,
            }
        }
        let mut core = self.core.borrow_mut();
        if let Some(ceiling) = ceiling {
            core.clock.advance_to(ceiling);
        }
        core.state = RunState::Finished;
        tracing::trace!(clock = %core.now(), "scheduler run finished");
        Ok(())
    }

    /// Validates `records` and wraps them in a hot source: emissions at
    /// absolute scripted ticks, records scripted before the attach tick
    /// dropped.
    pub fn create_hot_source<V: Value>(
        &self,
        records: Vec<Recorded<V>>,
    ) -> Result<SourceRef<V>> {
        Ok(self.hot_source(EventSequence::new(records)?))
    }

    /// Validates `records` and wraps them in a cold source: the whole
    /// script re-based to the attach tick.
    pub fn create_cold_source<V: Value>(
        &self,
        records: Vec<Recorded<V>>,
    ) -> Result<SourceRef<V>> {
        Ok(self.cold_source(EventSequence::new(records)?))
    }

    /// Hot source from an already validated script.
    pub fn hot_source<V: Value>(&self, script: EventSequence<V>) -> SourceRef<V> {
        Rc::new(HotSource::new(Rc::clone(&self.core), script))
    }

    /// Cold source from an already validated script.
    pub fn cold_source<V: Value>(&self, script: EventSequence<V>) -> SourceRef<V> {
        Rc::new(ColdSource::new(Rc::clone(&self.core), script))
    }

    /// A fresh recorder bound to this scheduler's clock.
    pub fn create_observer<V: Value>(&self) -> Rc<Recorder<V>> {
        Rc::new(Recorder::new(Rc::clone(&self.core)))
    }

    /// Bounded-window convenience: builds the source under test at
    /// `created`, subscribes a fresh recorder at `subscribed`, disposes at
    /// `disposed`, runs to completion, and returns the recorder.
    ///
    /// `build` runs at the `created` tick; apply combinators inside it so
    /// their setup cost lands at the scripted creation time.
    pub fn start_source<V: Value>(
        &self,
        created: impl Into<Tick>,
        subscribed: impl Into<Tick>,
        disposed: impl Into<Tick>,
        build: impl FnOnce() -> SourceRef<V> + 'static,
    ) -> Result<Rc<Recorder<V>>> {
        let recorder = self.create_observer::<V>();
        let source_slot: Rc<RefCell<Option<SourceRef<V>>>> = Rc::new(RefCell::new(None));
        let sub_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        {
            let source_slot = Rc::clone(&source_slot);
            self.schedule_at(created, move || {
                *source_slot.borrow_mut() = Some(build());
            })?;
        }
        {
            let source_slot = Rc::clone(&source_slot);
            let sub_slot = Rc::clone(&sub_slot);
            let observer = Rc::clone(&recorder);
            self.schedule_at(subscribed, move || {
                if let Some(source) = source_slot.borrow().as_ref() {
                    *sub_slot.borrow_mut() = Some(source.subscribe(observer));
                }
            })?;
        }
        {
            let sub_slot = Rc::clone(&sub_slot);
            self.schedule_at(disposed, move || {
                if let Some(sub) = sub_slot.borrow_mut().take() {
                    sub.dispose();
                }
            })?;
        }
        self.start()?;
        Ok(recorder)
    }
}

impl fmt::Debug for TestScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("TestScheduler")
            .field("now", &core.now())
            .field("pending", &core.queue.len())
            .finish()
    }
}
