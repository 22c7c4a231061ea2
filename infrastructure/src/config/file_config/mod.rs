//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

mod consolidation;
mod output;
mod proxy;
mod store;

pub use consolidation::FileConsolidationConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use proxy::FileProxyConfig;
pub use store::{FileEventsConfig, FileStoreConfig};

use assembly_application::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("proxy.max_per_receiver cannot be 0 (leave it unset for no limit)")]
    ZeroProxyCap,

    #[error("{field} cannot be empty")]
    EmptyPath { field: &'static str },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Proxy delegation settings
    pub proxy: FileProxyConfig,
    /// Official result consolidation settings
    pub consolidation: FileConsolidationConfig,
    /// Snapshot location
    pub store: FileStoreConfig,
    /// Domain event log
    pub events: FileEventsConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.proxy.max_per_receiver == Some(0) {
            issues.push(ConfigValidationError::ZeroProxyCap);
        }
        if self.store.snapshot_path.as_os_str().is_empty() {
            issues.push(ConfigValidationError::EmptyPath {
                field: "store.snapshot_path",
            });
        }
        if self
            .events
            .log_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            issues.push(ConfigValidationError::EmptyPath {
                field: "events.log_path",
            });
        }

        issues
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            proxy: self.proxy.to_proxy_config(),
            consolidation: self.consolidation.to_consolidation_config(),
        }
    }
}
