//! Application-level configuration.
//!
//! - [`EngineConfig`]: proxy cap and consolidation behaviour

pub mod engine_config;

pub use engine_config::{ConsolidationConfig, EngineConfig, ProxyConfig};
