//! Port for domain event publication.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port carries the domain events a
//! real-time transport or audit log subscribes to.

use assembly_domain::DomainEvent;
use std::sync::Mutex;

/// Receives committed domain events.
///
/// `publish` is synchronous and infallible: a failing sink must never abort
/// a vote, so implementations swallow their own errors.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &DomainEvent);
}

/// No-op implementation for tests and when publication is disabled.
pub struct NoEventSink;

impl EventSink for NoEventSink {
    fn publish(&self, _event: &DomainEvent) {}
}

/// Keeps every event in memory.
#[derive(Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.event_type()).collect()
    }
}

impl EventSink for CollectingEventSink {
    fn publish(&self, event: &DomainEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
