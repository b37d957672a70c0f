//! Hex-Color Pipeline Example
//!
//! Replays a cold script of hex color strings through a small derived-value
//! pipeline, the shape a reactive view-model gives its outputs:
//!
//! - `try_map` parses `"#rrggbb"` into an RGB triple; a malformed string
//!   becomes an `Error` notification that terminates that subscription
//! - `map` derives a human-readable color name from the triple
//!
//! The recorder log printed at the end shows each derived value at the
//! virtual tick it was produced, plus the terminal error for the bad input.

use std::sync::Arc;

use marbles::{completed, next, SourceExt, StreamError, TestScheduler};

#[derive(Debug, thiserror::Error)]
#[error("not a hex color: {0:?}")]
struct BadHex(String);

fn parse_hex(hex: &str) -> Result<(u8, u8, u8), BadHex> {
    let digits = hex.strip_prefix('#').ok_or_else(|| BadHex(hex.to_owned()))?;
    if digits.len() != 6 {
        return Err(BadHex(hex.to_owned()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| BadHex(hex.to_owned()))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn color_name(rgb: (u8, u8, u8)) -> &'static str {
    match rgb {
        (255, 0, 0) => "red",
        (0, 255, 0) => "green",
        (0, 0, 255) => "blue",
        (0, 102, 54) => "rayWenderlichGreen",
        _ => "unknown",
    }
}

fn main() -> marbles::Result {
    let scheduler = TestScheduler::new(0)?;
    let observer = scheduler.create_observer::<(&'static str, (u8, u8, u8))>();

    let hex_input = scheduler.create_cold_source(vec![
        next(0, "#ff0000"),
        next(100, "#00ff00"),
        next(200, "#006636"),
        next(300, "#nothex"),
        completed(400),
    ])?;

    let named_colors = hex_input
        .try_map(|hex| {
            parse_hex(hex).map_err(|e| Arc::new(e) as StreamError)
        })
        .map(|rgb| (color_name(*rgb), *rgb));

    let recorder = observer.clone();
    scheduler.schedule_at(0, move || {
        named_colors.subscribe(recorder);
    })?;
    scheduler.start()?;

    for record in observer.events() {
        println!("{record:?}");
    }
    Ok(())
}
