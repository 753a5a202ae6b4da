//! Completion gateway port
//!
//! Defines the interface for the hosted chat-completion API. The adapter
//! lives in the infrastructure layer; everything above it sees one request
//! shape and one stream of [`StreamEvent`]s.

use async_trait::async_trait;
use critique_domain::StreamEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed gateway payload: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// An outbound completion request: one system/persona instruction and the
/// user prompt as the sole user-role message.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Ask the gateway for the structured `{initial_query, my_analysis}`
    /// JSON document instead of free text (single-shot mode only).
    pub structured: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            structured: false,
        }
    }

    pub fn structured(mut self) -> Self {
        self.structured = true;
        self
    }
}

/// Handle for receiving streaming events from a gateway call.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all visible text into one string.
    ///
    /// Reasoning deltas are dropped; they never contribute to content.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::ReasoningDelta(_) => {}
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed — return what we have
        Ok(full_text)
    }
}

/// Gateway for chat completions
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// One non-streaming call; returns the first choice's content verbatim
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;

    /// One streaming call; deltas arrive in gateway order, exactly once
    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<StreamHandle, GatewayError>;
}
