//! Pipeline stage combinators.
//!
//! Each stage is a [`Source`](crate::Source) wrapping its input(s); nothing
//! happens until the stage is subscribed. Stages forward synchronously at
//! the incoming tick, which preserves the non-decreasing-tick invariant of
//! every output sequence. A stage that needed to delay a record would have
//! to re-register it as a new scheduled action rather than emit out of
//! clock order; none of the built-in stages delay.
//!
//! Use the [`SourceExt`](crate::SourceExt) methods rather than these types
//! directly.

mod amb;
mod filter;
mod map;
mod merge;

pub(crate) use amb::Amb;
pub(crate) use filter::Filter;
pub(crate) use map::Map;
pub(crate) use merge::Merge;
