use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{Notification, Observer, ObserverRef, Source, SourceRef, Subscription, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Races two sources: the first to notify wins, the loser is disposed on
/// the spot.
///
/// Winner selection is permanent. Disposing the loser before forwarding the
/// winning notification guarantees that nothing from the loser — not even a
/// record already in flight at the same tick — reaches the observer. A tie
/// at the identical first tick goes to the left side, which subscribes
/// first and therefore registered its emission first.
pub(crate) struct Amb<V: Value> {
    left: SourceRef<V>,
    right: SourceRef<V>,
}

impl<V: Value> Amb<V> {
    pub(crate) fn new(left: SourceRef<V>, right: SourceRef<V>) -> Self {
        Amb { left, right }
    }
}

#[derive(Default)]
struct Race {
    winner: Cell<Option<Side>>,
    left: RefCell<Option<Subscription>>,
    right: RefCell<Option<Subscription>>,
}

impl Race {
    fn loser_subscription(&self, winner: Side) -> Option<Subscription> {
        let loser = match winner {
            Side::Left => &self.right,
            Side::Right => &self.left,
        };
        loser.borrow().clone()
    }
}

impl<V: Value> Source<V> for Amb<V> {
    fn subscribe(&self, observer: ObserverRef<V>) -> Subscription {
        let race = Rc::new(Race::default());

        let left_sub = self.left.subscribe(Rc::new(RaceObserver {
            side: Side::Left,
            race: Rc::clone(&race),
            observer: observer.clone(),
        }));
        let right_sub = self.right.subscribe(Rc::new(RaceObserver {
            side: Side::Right,
            race: Rc::clone(&race),
            observer,
        }));

        *race.left.borrow_mut() = Some(left_sub.clone());
        *race.right.borrow_mut() = Some(right_sub.clone());

        Subscription::tied(vec![left_sub, right_sub])
    }
}

struct RaceObserver<V: Value> {
    side: Side,
    race: Rc<Race>,
    observer: ObserverRef<V>,
}

impl<V: Value> Observer<V> for RaceObserver<V> {
    fn on_event(&self, event: Notification<V>) {
        match self.race.winner.get() {
            None => {
                self.race.winner.set(Some(self.side));
                tracing::trace!(side = ?self.side, "amb winner decided");
                if let Some(loser) = self.race.loser_subscription(self.side) {
                    loser.dispose();
                }
                self.observer.on_event(event);
            }
            Some(winner) if winner == self.side => self.observer.on_event(event),
            // A loser-side record dequeued in the same tick as the decision.
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{completed, next, SourceExt, TestScheduler};

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
    fn earlier_first_emission_wins() {
        let scheduler = TestScheduler::new(0).unwrap();
        let a = scheduler
            .create_hot_source(vec![next(100, "a)"), next(200, "b)"), next(300, "c)")])
            .unwrap();
        let b = scheduler
            .create_hot_source(vec![next(90, "1)"), next(250, "2)"), next(300, "3)")])
            .unwrap();

        let observer = subscribe_at_zero(&scheduler, a.amb(&b));
        scheduler.start().unwrap();

        assert_eq!(observer.values(), vec!["1)", "2)", "3)"]);
    }

    #[test]
    fn tie_at_identical_tick_goes_to_left_side() {
        let scheduler = TestScheduler::new(0).unwrap();
        let a = scheduler
            .create_hot_source(vec![next(100, "left"), next(200, "left2")])
            .unwrap();
        let b = scheduler
            .create_hot_source(vec![next(100, "right"), next(150, "right2")])
            .unwrap();

        let observer = subscribe_at_zero(&scheduler, a.amb(&b));
        scheduler.start().unwrap();

        assert_eq!(observer.values(), vec!["left", "left2"]);
    }

    #[test]
    fn loser_never_appears_after_winner_chosen() {
        // Loser keeps emitting long after the race; none of it lands.
        let scheduler = TestScheduler::new(0).unwrap();
        let winner = scheduler
            .create_hot_source(vec![next(50, 1), completed(60)])
            .unwrap();
        let loser = scheduler
            .create_hot_source(vec![next(70, 99), next(500, 99), next(900, 99)])
            .unwrap();

        let observer = subscribe_at_zero(&scheduler, winner.amb(&loser));
        scheduler.start().unwrap();

        assert_eq!(observer.events(), vec![next(50, 1), completed(60)]);
    }

    #[test]
    fn terminal_notification_can_decide_the_race() {
        let scheduler = TestScheduler::new(0).unwrap();
        let a = scheduler.create_hot_source(vec![completed(80)]).unwrap();
        let b = scheduler
            .create_hot_source(vec![next(100, 5), next(200, 6)])
            .unwrap();

        let observer = subscribe_at_zero(&scheduler, a.amb(&b));
        scheduler.start().unwrap();

        assert_eq!(observer.events(), vec![completed(80)]);
    }
}
