use crate::{completed, next, Error, Recorded, Result, Value};

/// A validated source script: records ordered by non-decreasing tick, with
/// at most one terminal record, which must come last.
///
/// Violating either rule is a configuration error surfaced at construction
/// time, before any scheduling happens:
///
/// ```rust
/// use marbles::{next, completed, EventSequence, Error};
///
/// let ok = EventSequence::new(vec![next(100, 1), next(200, 2), completed(300)]);
/// assert!(ok.is_ok());
///
/// let bad = EventSequence::new(vec![next(200, 1), next(100, 2)]);
/// assert!(matches!(bad, Err(Error::NonMonotonicSequence { .. })));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EventSequence<V> {
    records: Vec<Recorded<V>>,
}

impl<V: Value> EventSequence<V> {
    /// Validates and wraps a script.
    ///
    /// # Errors
    ///
    /// - [`Error::NegativeSequenceTick`] if any record has a negative tick
    /// - [`Error::NonMonotonicSequence`] if ticks decrease
    /// - [`Error::TerminalNotLast`] if an `Error`/`Completed` record is
    ///   followed by further records
    pub fn new(records: Vec<Recorded<V>>) -> Result<Self> {
        let mut prev: Option<&Recorded<V>> = None;
        for (index, record) in records.iter().enumerate() {
            if record.tick.is_negative() {
                return Err(Error::NegativeSequenceTick { index, tick: record.tick });
            }
            if let Some(prev) = prev {
                if prev.value.is_terminal() {
                    return Err(Error::TerminalNotLast { index: index - 1 });
                }
                if record.tick < prev.tick {
                    return Err(Error::NonMonotonicSequence {
                        index,
                        prev: prev.tick,
                        found: record.tick,
                    });
                }
            }
            prev = Some(record);
        }
        Ok(EventSequence { records })
    }

    /// Scripts each value at tick 0 followed by completion, the shape of an
    /// "emit these immediately" source.
    pub fn of(values: impl IntoIterator<Item = V>) -> Self {
        let mut records: Vec<Recorded<V>> =
            values.into_iter().map(|v| next(0, v)).collect();
        records.push(completed(0));
        EventSequence { records }
    }

    pub fn records(&self) -> &[Recorded<V>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recorded<V>> {
        self.records.iter()
    }
}

impl<V: Value> TryFrom<Vec<Recorded<V>>> for EventSequence<V> {
    type Error = Error;

    fn try_from(records: Vec<Recorded<V>>) -> Result<Self> {
        EventSequence::new(records)
    }
}

impl<'a, V> IntoIterator for &'a EventSequence<V> {
    type Item = &'a Recorded<V>;
    type IntoIter = std::slice::Iter<'a, Recorded<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::error as record_error;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn accepts_non_decreasing_script_with_trailing_terminal() {
        let seq = EventSequence::new(vec![
            next(90, "1)"),
            next(250, "2)"),
            next(300, "3)"),
            completed(300),
        ]);
        assert_eq!(seq.unwrap().len(), 4);
    }

    #[test]
    fn accepts_equal_adjacent_ticks() {
        assert!(EventSequence::new(vec![next(100, 1), next(100, 2)]).is_ok());
    }

    #[test]
    fn rejects_decreasing_ticks() {
        let err = EventSequence::new(vec![next(200, 1), next(100, 2)]).unwrap_err();
        assert_eq!(
            err,
            Error::NonMonotonicSequence {
                index: 1,
                prev: 200.into(),
                found: 100.into()
            }
        );
    }

    #[test]
    fn rejects_negative_tick() {
        let err = EventSequence::new(vec![next(-5, 1)]).unwrap_err();
        assert_eq!(err, Error::NegativeSequenceTick { index: 0, tick: (-5).into() });
    }

    #[test]
    fn rejects_records_after_terminal() {
        let err =
            EventSequence::new(vec![next(100, 1), completed(200), next(300, 2)]).unwrap_err();
        assert_eq!(err, Error::TerminalNotLast { index: 1 });

        let err =
            EventSequence::<i32>::new(vec![record_error(100, Boom), completed(200)]).unwrap_err();
        assert_eq!(err, Error::TerminalNotLast { index: 0 });
    }

    #[test]
    fn of_scripts_values_at_zero_and_completes() {
        let seq = EventSequence::of(["1)", "2)"]);
        assert_eq!(
            seq.records(),
            &[next(0, "1)"), next(0, "2)"), completed(0)]
        );
    }

    #[test]
    fn empty_script_is_valid() {
        assert!(EventSequence::<i32>::new(vec![]).unwrap().is_empty());
    }
}
