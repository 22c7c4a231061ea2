//! JSONL file writer for domain events.
//!
//! Each [`DomainEvent`] becomes one JSON line: the event's own fields, its
//! `type` tag, and a `timestamp` of when the line was written. The file is
//! opened in append mode so successive runs extend the same audit trail.

use assembly_application::EventSink;
use assembly_domain::DomainEvent;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only JSONL event log.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; the engine then runs
    /// without an event log.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonlEventLog {
    fn publish(&self, event: &DomainEvent) {
        let mut record = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                warn!(event = event.event_type(), "Could not serialize event: {}", e);
                return;
            }
        };
        if let serde_json::Value::Object(map) = &mut record {
            let timestamp =
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
        }

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!(path = %self.path.display(), "Could not append event: {}", e);
            }
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_domain::{MeetingId, MeetingStatus, MotionId};
    use chrono::{TimeZone, Utc};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_log_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");
        let log = JsonlEventLog::open(&path).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();

        log.publish(&DomainEvent::MotionOpened {
            meeting: MeetingId(1),
            motion: MotionId(3),
            at,
        });
        log.publish(&DomainEvent::MeetingStatusChanged {
            meeting: MeetingId(1),
            from: MeetingStatus::Live,
            to: MeetingStatus::Closed,
            at,
        });
        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "motion_opened");
        assert_eq!(lines[0]["motion"], 3);
        assert!(lines[0].get("timestamp").is_some());
        assert_eq!(lines[1]["type"], "meeting_status_changed");
    }

    #[test]
    fn test_event_log_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let event = DomainEvent::MotionClosed {
            meeting: MeetingId(1),
            motion: MotionId(1),
            at: Utc::now(),
        };

        for _ in 0..2 {
            let log = JsonlEventLog::open(&path).unwrap();
            log.publish(&event);
        }

        assert_eq!(read_lines(&path).len(), 2);
    }
}
