use crate::Tick;

/// Monotonically non-decreasing virtual clock.
///
/// One clock drives every scheduling decision in a run. It only moves
/// forward: the scheduler advances it to each executed action's tick,
/// never backwards.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    now: Tick,
}

impl VirtualClock {
    pub(crate) fn new(initial: Tick) -> Self {
        VirtualClock { now: initial }
    }

    /// Current virtual time.
    pub fn now(&self) -> Tick {
        self.now
    }

    pub(crate) fn advance_to(&mut self, tick: Tick) {
        debug_assert!(tick >= self.now, "clock moved backwards: {} -> {}", self.now, tick);
        self.now = tick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_forward() {
        let mut clock = VirtualClock::new(Tick::ZERO);
        clock.advance_to(Tick::new(100));
        assert_eq!(clock.now(), Tick::new(100));
        clock.advance_to(Tick::new(100));
        assert_eq!(clock.now(), Tick::new(100));
    }
}
