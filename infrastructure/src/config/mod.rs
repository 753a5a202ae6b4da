//! Configuration file loading for critique
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `CRITIQUE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./critique.toml` or `./.critique.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/critique/config.toml`
//! 5. Fallback: `~/.config/critique/config.toml`
//! 6. Default values
//!
//! The API credential is deliberately NOT part of the file config; it is
//! read from the process environment only. See [`ApiCredential`].

mod credential;
mod file_config;
mod loader;

pub use credential::ApiCredential;
pub use file_config::{
    ConfigValidationError, FileConfig, FileCriticEntry, FileCriticsConfig, FileGatewayConfig,
    FileServerConfig,
};
pub use loader::ConfigLoader;
