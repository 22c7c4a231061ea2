//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "assembly-vote";
const PROJECT_FILES: [&str; 2] = ["assembly.toml", ".assembly.toml"];
const ENV_PREFIX: &str = "ASSEMBLY_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `ASSEMBLY_PROXY__MAX_PER_RECEIVER=2`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./assembly.toml` or `./.assembly.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/assembly-vote/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// Layer the file sources over the defaults; missing files are skipped.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // An explicit path that does not exist is an error, not a skip
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/assembly-vote/config.toml if set,
    /// otherwise falls back to ~/.config/assembly-vote/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for `show-config`)
    pub fn config_sources(explicit: Option<&PathBuf>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] Environment: {}*", ENV_PREFIX));

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            lines.push(format!("  [{}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./assembly.toml or ./.assembly.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileOutputFormat;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.proxy.max_per_receiver, None);
        assert!(config.consolidation.auto_on_close);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("assembly-vote"));
    }

    #[test]
    fn test_explicit_file_overrides_project_and_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("assembly.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&global, "[proxy]\nmax_per_receiver = 5\n[output]\ncolor = false\n").unwrap();
        fs::write(&project, "[proxy]\nmax_per_receiver = 3\n").unwrap();
        fs::write(&explicit, "[output]\nformat = \"json\"\n").unwrap();

        let config: FileConfig =
            ConfigLoader::figment(Some(&global), Some(&project), Some(&explicit))
                .extract()
                .unwrap();

        assert_eq!(config.proxy.max_per_receiver, Some(3));
        assert!(!config.output.color);
        assert_eq!(config.output.format, Some(FileOutputFormat::Json));
        assert!(config.consolidation.lock_motion);
    }

    #[test]
    fn test_missing_layers_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");

        let config: FileConfig = ConfigLoader::figment(Some(&absent), None, None)
            .extract()
            .unwrap();

        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");

        let result = ConfigLoader::figment(None, None, Some(&absent)).extract::<FileConfig>();
        assert!(result.is_err());
    }
}
