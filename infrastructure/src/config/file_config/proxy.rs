//! Proxy configuration from TOML (`[proxy]` section)

use assembly_application::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Raw proxy configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProxyConfig {
    /// Maximum active delegations one member may hold (unset = unbounded)
    pub max_per_receiver: Option<u32>,
}

impl FileProxyConfig {
    pub fn to_proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            max_per_receiver: self.max_per_receiver,
        }
    }
}
