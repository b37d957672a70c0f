//! Wall-clock replay for asynchronous verification outside virtual time.
//!
//! Enable with the `realtime` feature. This is a thin adapter around a
//! current-thread Tokio runtime, deliberately decoupled from the
//! deterministic core: it never touches a [`TestScheduler`](crate::TestScheduler)
//! or its clock. A script's ticks are mapped to wall-clock offsets via a
//! configurable tick unit and the drain blocks until the first value, all
//! values, or a deadline.

use std::time::Duration;

use tokio::time::{sleep_until, timeout, Instant};

use crate::{Error, EventSequence, Notification, Result, Value};

/// Replays an [`EventSequence`] over real time and blocks for its output.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use marbles::{realtime::BlockingDrain, EventSequence};
///
/// let drain = BlockingDrain::new(EventSequence::of(["1)", "2)"]));
/// let values = drain.collect(Duration::from_secs(1)).unwrap();
/// assert_eq!(values, vec!["1)", "2)"]);
/// ```
pub struct BlockingDrain<V: Value> {
    script: EventSequence<V>,
    tick_unit: Duration,
}

impl<V: Value> BlockingDrain<V> {
    /// One tick = one millisecond.
    pub fn new(script: EventSequence<V>) -> Self {
        Self::with_tick_unit(script, Duration::from_millis(1))
    }

    pub fn with_tick_unit(script: EventSequence<V>, tick_unit: Duration) -> Self {
        BlockingDrain { script, tick_unit }
    }

    /// Blocks until the first `Next` value or the deadline.
    ///
    /// Returns `Ok(None)` if the script completes without emitting.
    ///
    /// # Errors
    ///
    /// - [`Error::Consumer`] if the script errors first
    /// - [`Error::DrainTimeout`] if the deadline passes first
    pub fn first(self, limit: Duration) -> Result<Option<V>> {
        let runtime = runtime()?;
        let BlockingDrain { script, tick_unit } = self;
        runtime.block_on(async move {
            let start = Instant::now();
            let outcome = timeout(limit, async {
                for record in &script {
                    sleep_until(start + offset(tick_unit, record.tick.value())).await;
                    match &record.value {
                        Notification::Next(v) => return Ok(Some(v.clone())),
                        Notification::Error(e) => return Err(Error::Consumer(e.clone())),
                        Notification::Completed => return Ok(None),
                    }
                }
                Ok(None)
            })
            .await;
            match outcome {
                Ok(result) => result,
                Err(_) => Err(Error::DrainTimeout(limit, 0)),
            }
        })
    }

    /// Blocks until the script terminates (or runs out of records), then
    /// returns every `Next` value in order.
    ///
    /// # Errors
    ///
    /// - [`Error::Consumer`] if the script errors
    /// - [`Error::DrainTimeout`] if the deadline passes first; the count of
    ///   values drained so far is carried in the error
    pub fn collect(self, limit: Duration) -> Result<Vec<V>> {
        let runtime = runtime()?;
        let BlockingDrain { script, tick_unit } = self;
        runtime.block_on(async move {
            let start = Instant::now();
            let mut values: Vec<V> = Vec::new();
            let outcome = timeout(limit, async {
                for record in &script {
                    sleep_until(start + offset(tick_unit, record.tick.value())).await;
                    match &record.value {
                        Notification::Next(v) => values.push(v.clone()),
                        Notification::Error(e) => return Err(Error::Consumer(e.clone())),
                        Notification::Completed => return Ok(()),
                    }
                }
                Ok(())
            })
            .await;
            match outcome {
                Ok(Ok(())) => Ok(values),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(Error::DrainTimeout(limit, values.len())),
            }
        })
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    Ok(runtime)
}

fn offset(tick_unit: Duration, ticks: i64) -> Duration {
    // Script ticks are validated non-negative at construction.
    let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
    tick_unit.saturating_mul(ticks)
}
