#![cfg_attr(docsrs, feature(doc_cfg))]
//! # Marbles
//!
//! A deterministic virtual-time scheduler for marble-style event-stream
//! testing.
//!
//! Script hot and cold sources as timestamped event sequences, pipe them
//! through combinators (`filter`, `map`, `amb`, `merge`), and assert the
//! recorded output tick-for-tick. One virtual clock drives every emission,
//! so the interleaving of any number of sources and stages is exactly
//! reproducible: no sleeps, no flakes, no wall-clock time.
//!
//! ## Quick Start
//!
//! ```rust
//! use marbles::{next, SourceExt, TestScheduler};
//!
//! fn main() -> marbles::Result {
//!     let scheduler = TestScheduler::new(0)?;
//!     let observer = scheduler.create_observer::<&str>();
//!
//!     let a = scheduler.create_hot_source(vec![
//!         next(100, "a)"),
//!         next(200, "b)"),
//!         next(300, "c)"),
//!     ])?;
//!     let b = scheduler.create_hot_source(vec![
//!         next(90, "1)"),
//!         next(250, "2)"),
//!         next(300, "3)"),
//!     ])?;
//!
//!     let race = a.amb(&b);
//!     let recorder = observer.clone();
//!     scheduler.schedule_at(0, move || {
//!         race.subscribe(recorder);
//!     })?;
//!     scheduler.start()?;
//!
//!     // b's first record fires at tick 90, before a's at 100: b wins.
//!     assert_eq!(observer.values(), vec!["1)", "2)", "3)"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tick`] | Unit of virtual time |
//! | [`TestScheduler`] | Per-test clock plus pending-action queue; run once |
//! | [`Notification`] | One `Next` / `Error` / `Completed` occurrence |
//! | [`Recorded`] | A notification stamped with its tick |
//! | [`EventSequence`] | Validated source script (non-decreasing ticks, terminal last) |
//! | [`Source`] | Capability implemented by replay sources and pipeline stages |
//! | [`SourceExt`] | Combinators: `filter`, `map`, `amb`, `merge` and fallible variants |
//! | [`Subscription`] | Disposal handle; disposed subscriptions deliver nothing |
//! | [`Recorder`] | Observer that logs `(tick, notification)` pairs for assertion |
//!
//! ## Hot vs. cold
//!
//! A **hot** source replays its script at absolute ticks and silently
//! drops records scripted before the attach tick, like a live broadcast
//! joined late. A **cold** source re-bases the whole script to the attach
//! tick, replaying from the start for every subscriber.
//!
//! ## Determinism
//!
//! Actions at the same tick run in registration order, and disposal is
//! synchronous: a dispose registered before an emission at the same tick
//! suppresses it. The core is single-threaded and `!Send` by design;
//! handles are `Rc`-based and meant for one test at a time.
//!
//! ## Features
//!
//! - **`recorder`** - [`export::export_jsonl`] writes a recorded log as JSON Lines
//! - **`realtime`** - [`realtime::BlockingDrain`] replays a script over
//!   wall-clock time on a Tokio runtime and blocks for first/all values

mod clock;
mod error;
mod event;
mod observer;
mod ops;
mod recorder;
mod replay;
mod scheduler;
mod sequence;
mod source;
mod subscription;
mod tick;

#[cfg(feature = "recorder")]
#[cfg_attr(docsrs, doc(cfg(feature = "recorder")))]
pub mod export;

#[cfg(feature = "realtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "realtime")))]
pub mod realtime;

pub use clock::VirtualClock;
pub use error::Error;
pub use event::{completed, error, next, Notification, Recorded, StreamError, Value};
pub use observer::{Observer, ObserverRef};
pub use recorder::Recorder;
pub use replay::{ColdSource, HotSource};
pub use scheduler::TestScheduler;
pub use sequence::EventSequence;
pub use source::{Source, SourceExt, SourceRef};
pub use subscription::Subscription;
pub use tick::Tick;

/// Convenience alias for `Result<T, marbles::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
