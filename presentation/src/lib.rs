//! Presentation layer for assembly-vote
//!
//! This crate contains the CLI definitions and the console/JSON
//! output formatters.

pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{CastArgs, Cli, Command, ManualTallyArgs, OutputFormat};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
