use std::fmt;

/// The atomic unit of virtual time.
///
/// Ticks are plain signed integers so that invalid schedules (negative
/// times) can be rejected with a typed error instead of a panic or a
/// silent wrap. All valid scheduler state holds non-negative ticks.
///
/// `Tick` converts from `i64` implicitly at API boundaries, so test
/// scripts read naturally: `next(100, "a)")`, `scheduler.schedule_at(0, ..)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "recorder", derive(serde::Serialize))]
#[cfg_attr(feature = "recorder", serde(transparent))]
pub struct Tick(i64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[must_use]
    pub const fn new(tick: i64) -> Self {
        Tick(tick)
    }

    /// Returns the raw tick value.
    pub const fn value(self) -> i64 {
        self.0
    }

    pub(crate) const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Re-bases `self` (a script offset) onto `base` (an attach tick).
    pub(crate) const fn rebase(self, base: Tick) -> Tick {
        Tick(self.0.saturating_add(base.0))
    }
}

impl From<i64> for Tick {
    fn from(value: i64) -> Self {
        Tick(value)
    }
}

// Unsuffixed literals fall back to i32; without this, `next(100, v)` and
// `schedule_at(0, ..)` would need `i64` annotations at every call site.
impl From<i32> for Tick {
    fn from(value: i32) -> Self {
        Tick(i64::from(value))
    }
}

impl From<Tick> for i64 {
    fn from(value: Tick) -> Self {
        value.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_order_by_value() {
        assert!(Tick::new(90) < Tick::new(100));
        assert!(Tick::ZERO < Tick::new(1));
        assert!(Tick::new(-1).is_negative());
    }

    #[test]
    fn rebase_shifts_by_attach_tick() {
        assert_eq!(Tick::new(30).rebase(Tick::new(200)), Tick::new(230));
        assert_eq!(Tick::ZERO.rebase(Tick::new(50)), Tick::new(50));
    }

    #[test]
    fn display_includes_at_sign() {
        assert_eq!(Tick::new(250).to_string(), "@250");
    }
}
