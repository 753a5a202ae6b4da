//! API credential handling
//!
//! The credential is sourced from the process environment only and is kept
//! out of the serializable config tree so it can never land in a config
//! file, a log line, or a debug dump.

use crate::openai::error::OpenAiError;

/// Environment variable holding the gateway API key
pub const CREDENTIAL_ENV_VAR: &str = "OPENAI_API_KEY";

/// Wrapper around the gateway API key with a redacted `Debug` impl
#[derive(Clone)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Read the credential from the environment
    pub fn from_env() -> Result<Self, OpenAiError> {
        match std::env::var(CREDENTIAL_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => Ok(Self(value)),
            _ => Err(OpenAiError::MissingCredential),
        }
    }

    /// Wrap an already-obtained key (tests, alternate sources)
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for constructing the Authorization header
    pub(crate) fn reveal(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiCredential(<redacted>)")
    }
}
