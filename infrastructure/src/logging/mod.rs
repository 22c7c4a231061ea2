//! Logging infrastructure: the domain event audit trail.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements
//! the [`EventSink`](assembly_application::EventSink) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLog;
