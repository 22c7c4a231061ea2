//! Engine configuration: use case behaviour knobs.
//!
//! [`EngineConfig`] is an application-layer concern: it changes how the use
//! cases apply the domain rules, never the rules themselves.

use serde::{Deserialize, Serialize};

/// Proxy delegation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Active delegations one receiver may hold (`None` = unbounded)
    pub max_per_receiver: Option<u32>,
}

/// Official result consolidation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Closing a motion consolidates it
    pub auto_on_close: bool,
    /// Hold the per-motion lock while consolidating
    pub lock_motion: bool,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            auto_on_close: true,
            lock_motion: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub proxy: ProxyConfig,
    pub consolidation: ConsolidationConfig,
}

impl EngineConfig {
    // ==================== Builder Methods ====================

    pub fn with_proxy_cap(mut self, cap: Option<u32>) -> Self {
        self.proxy.max_per_receiver = cap;
        self
    }

    pub fn with_auto_consolidation(mut self, enabled: bool) -> Self {
        self.consolidation.auto_on_close = enabled;
        self
    }

    pub fn with_motion_lock(mut self, enabled: bool) -> Self {
        self.consolidation.lock_motion = enabled;
        self
    }
}
