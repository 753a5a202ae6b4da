//! Error types for the gateway adapter

use critique_application::GatewayError;
use thiserror::Error;

/// Result type alias for gateway adapter operations
pub type Result<T> = std::result::Result<T, OpenAiError>;

/// Errors that can occur when communicating with the hosted gateway
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse gateway response: {0}")]
    MalformedResponse(String),

    #[error("API credential is not configured")]
    MissingCredential,
}

impl From<OpenAiError> for GatewayError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            OpenAiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            OpenAiError::MalformedResponse(e) => GatewayError::MalformedResponse(e),
            other => GatewayError::RequestFailed(other.to_string()),
        }
    }
}
