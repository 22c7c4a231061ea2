//! Infrastructure layer for assembly-vote
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod clock;
pub mod config;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use clock::SystemClock;
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig, FileOutputFormat,
};
pub use logging::JsonlEventLog;
pub use store::{InMemoryStore, SnapshotError, StoreSnapshot};
