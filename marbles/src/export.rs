//! JSON Lines export of recorded logs.
//!
//! Enable with the `recorder` feature:
//!
//! ```toml
//! [dev-dependencies]
//! marbles = { version = "0.1", features = ["recorder"] }
//! ```
//!
//! Each recorded notification becomes one JSON object per line, easy to
//! diff or feed to external tooling when a log assertion fails.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{Notification, Recorder, Result, Tick, Value};

#[derive(Serialize)]
struct Row<'a, V> {
    tick: Tick,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Writes the recorder's full log to `path`, one JSON object per line.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) if the file cannot be created or
/// written.
pub fn export_jsonl<V, P>(recorder: &Recorder<V>, path: P) -> Result
where
    V: Value + Serialize,
    P: AsRef<Path>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let events = recorder.events();
    for record in &events {
        let tick = record.tick;
        let row = match &record.value {
            Notification::Next(v) => Row { tick, kind: "next", value: Some(v), error: None },
            Notification::Error(e) => Row {
                tick,
                kind: "error",
                value: None,
                error: Some(e.to_string()),
            },
            Notification::Completed => Row { tick, kind: "completed", value: None, error: None },
        };
        serde_json::to_writer(&mut writer, &row).map_err(std::io::Error::from)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    tracing::trace!(records = events.len(), "exported recorder log");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{completed, next, TestScheduler};
    use std::rc::Rc;

    #[test]
    fn writes_one_json_object_per_record() {
        let scheduler = TestScheduler::new(0).unwrap();
        let source = scheduler
            .create_hot_source(vec![next(100, "a)"), completed(200)])
            .unwrap();
        let observer = scheduler.create_observer::<&str>();
        {
            let observer = Rc::clone(&observer);
            scheduler
                .schedule_at(0, move || {
                    source.subscribe(observer);
                })
                .unwrap();
        }
        scheduler.start().unwrap();

        let path = std::env::temp_dir().join("marbles_export_test.jsonl");
        export_jsonl(&observer, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"tick":100,"kind":"next","value":"a)"}"#);
        assert_eq!(lines[1], r#"{"tick":200,"kind":"completed"}"#);

        let _ = std::fs::remove_file(&path);
    }
}
