//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CRITIQUE_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./critique.toml` or `./.critique.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/critique/config.toml`
    /// 5. Fallback: `~/.config/critique/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Add global config (XDG or fallback)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        // Add the project-level config file, if one exists
        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        // Add explicit config path
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables win, e.g. CRITIQUE_SERVER__PORT=8080
        figment = figment.merge(Env::prefixed("CRITIQUE_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/critique/config.toml if set,
    /// otherwise falls back to ~/.config/critique/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("critique").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists).
    ///
    /// `critique.toml` wins over `.critique.toml` when both are present.
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["critique.toml", ".critique.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}
