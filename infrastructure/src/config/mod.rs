//! Configuration file loading for assembly-vote
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ASSEMBLY_` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./assembly.toml` or `./.assembly.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/assembly-vote/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConsolidationConfig, FileEventsConfig,
    FileOutputConfig, FileOutputFormat, FileProxyConfig, FileStoreConfig,
};
pub use loader::ConfigLoader;
