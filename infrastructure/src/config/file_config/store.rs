//! Store and event log configuration from TOML (`[store]`, `[events]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw store configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// JSON snapshot holding the engine state
    pub snapshot_path: PathBuf,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("assembly.json"),
        }
    }
}

/// Raw event log configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEventsConfig {
    /// JSONL file receiving domain events (unset = events are dropped)
    pub log_path: Option<PathBuf>,
}
