//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types where
//! appropriate.

use critique_domain::{CriticDescriptor, CriticIndex, CriticPanel, DomainError, FramingMode, MAX_CRITICS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("request_timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("critic personality cannot be empty")]
    EmptyPersonality,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Raw HTTP server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Stream framing for the relay ("sse" or "json-lines")
    pub framing: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            framing: "sse".to_string(),
        }
    }
}

impl FileServerConfig {
    /// Parse the framing string, falling back to the default mode
    pub fn framing_mode(&self) -> FramingMode {
        self.framing.parse().unwrap_or_default()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Raw gateway configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model for critic commentary and the single-shot path
    pub chat_model: String,
    /// Model for audio transcription
    pub transcription_model: String,
    /// Model for image description
    pub vision_model: String,
    /// Timeout in seconds for non-streaming API calls
    pub request_timeout_secs: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o".to_string(),
            transcription_model: "whisper-1".to_string(),
            vision_model: "gpt-4o".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl FileGatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// One configured critic persona from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCriticEntry {
    /// Display name; generated from the index when empty
    pub name: String,
    /// Prompt fragment that shapes this critic's voice
    pub personality: String,
}

/// Raw critics configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCriticsConfig {
    /// Panel size when no explicit roster is given
    pub count: usize,
    /// Explicit roster; overrides `count` when non-empty
    pub roster: Vec<FileCriticEntry>,
}

impl Default for FileCriticsConfig {
    fn default() -> Self {
        Self {
            count: MAX_CRITICS,
            roster: Vec::new(),
        }
    }
}

impl FileCriticsConfig {
    /// Build the domain panel from this raw configuration
    pub fn panel(&self) -> Result<CriticPanel, ConfigValidationError> {
        if self.roster.is_empty() {
            return Ok(CriticPanel::with_default_roster(self.count)?);
        }
        let critics = self
            .roster
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if entry.personality.trim().is_empty() {
                    return Err(ConfigValidationError::EmptyPersonality);
                }
                let index = CriticIndex::new(i + 1)?;
                let name = if entry.name.trim().is_empty() {
                    format!("critic {}", i + 1)
                } else {
                    entry.name.clone()
                };
                Ok(CriticDescriptor::new(index, name, entry.personality.clone()))
            })
            .collect::<Result<Vec<_>, ConfigValidationError>>()?;
        Ok(CriticPanel::new(critics)?)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Gateway settings
    pub gateway: FileGatewayConfig,
    /// Critic panel settings
    pub critics: FileCriticsConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.gateway.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        // Panel construction performs the roster checks
        self.critics.panel().map(|_| ())
    }
}
