//! Source Race Example
//!
//! Two hot feeds race through `amb`: whichever notifies first becomes the
//! only feed the observer ever hears from. Feed B's first record is
//! scripted at tick 90, ten ticks before feed A's, so B wins and A is
//! disposed on the spot.
//!
//! Change B's first tick to 100 to see the tie-break: at identical first
//! ticks the side subscribed first (A) wins.

use marbles::{next, SourceExt, TestScheduler};

fn main() -> marbles::Result {
    let scheduler = TestScheduler::new(0)?;
    let observer = scheduler.create_observer::<&str>();

    let feed_a = scheduler.create_hot_source(vec![
        next(100, "a)"),
        next(200, "b)"),
        next(300, "c)"),
    ])?;
    let feed_b = scheduler.create_hot_source(vec![
        next(90, "1)"),
        next(250, "2)"),
        next(300, "3)"),
    ])?;

    let race = feed_a.amb(&feed_b);
    let recorder = observer.clone();
    scheduler.schedule_at(0, move || {
        race.subscribe(recorder);
    })?;
    scheduler.start()?;

    println!("winner's log:");
    for record in observer.events() {
        println!("  {record:?}");
    }
    Ok(())
}
