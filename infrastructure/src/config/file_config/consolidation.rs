//! Consolidation configuration from TOML (`[consolidation]` section)

use assembly_application::ConsolidationConfig;
use serde::{Deserialize, Serialize};

/// Raw consolidation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsolidationConfig {
    /// Consolidate a motion as soon as it is closed
    pub auto_on_close: bool,
    /// Hold the motion lock while consolidating
    pub lock_motion: bool,
}

impl Default for FileConsolidationConfig {
    fn default() -> Self {
        let defaults = ConsolidationConfig::default();
        Self {
            auto_on_close: defaults.auto_on_close,
            lock_motion: defaults.lock_motion,
        }
    }
}

impl FileConsolidationConfig {
    pub fn to_consolidation_config(&self) -> ConsolidationConfig {
        ConsolidationConfig {
            auto_on_close: self.auto_on_close,
            lock_motion: self.lock_motion,
        }
    }
}
