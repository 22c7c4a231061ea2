//! Presentation-level configuration
//!
//! How results are rendered once the file config and CLI flags are merged.

use crate::cli::commands::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
        }
    }
}

impl OutputConfig {
    /// A `-o` flag wins over the configured format.
    pub fn resolve(flag: Option<OutputFormat>, configured: Option<OutputFormat>, color: bool) -> Self {
        Self {
            format: flag.or(configured).unwrap_or(OutputFormat::Full),
            color,
        }
    }

    /// Apply the color setting process-wide; JSON is never colored.
    pub fn apply(&self) {
        if !self.color || self.format == OutputFormat::Json {
            colored::control::set_override(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_config() {
        let config = OutputConfig::resolve(Some(OutputFormat::Json), Some(OutputFormat::Full), true);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_falls_back_to_full() {
        assert_eq!(OutputConfig::resolve(None, None, false).format, OutputFormat::Full);
        assert_eq!(
            OutputConfig::resolve(None, Some(OutputFormat::Json), true).format,
            OutputFormat::Json
        );
    }
}
