//! Persistence adapters
//!
//! [`InMemoryStore`] implements every store port of the application layer;
//! [`StoreSnapshot`] is its JSON form on disk.

mod memory;
mod snapshot;

pub use memory::InMemoryStore;
pub use snapshot::{AttendanceRecord, SNAPSHOT_VERSION, SnapshotError, StoreSnapshot};
