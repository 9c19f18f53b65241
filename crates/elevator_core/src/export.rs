//! Writes events and snapshots to disk for offline inspection.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::events::SystemEvent;
use crate::snapshot::SystemSnapshot;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("export encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One JSON object per line. Returns the number of events written.
pub fn write_events_jsonl<W: Write>(mut writer: W, events: &[SystemEvent]) -> Result<usize, ExportError> {
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(events.len())
}

pub fn write_events_jsonl_file<P: AsRef<Path>>(
    path: P,
    events: &[SystemEvent],
) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    write_events_jsonl(BufWriter::new(file), events)
}

pub fn write_snapshot_json<P: AsRef<Path>>(
    path: P,
    snapshot: &SystemSnapshot,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SystemEventKind;

    #[test]
    fn writes_one_line_per_event() {
        let events = vec![
            SystemEvent {
                tick: 1,
                kind: SystemEventKind::EmergencyStopped,
            },
            SystemEvent {
                tick: 2,
                kind: SystemEventKind::ServiceResumed,
            },
        ];
        let mut buf = Vec::new();
        assert_eq!(write_events_jsonl(&mut buf, &events).expect("write"), 2);

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("json");
        assert_eq!(first["tick"], 1);
        assert_eq!(first["type"], "emergency_stopped");
    }
}
