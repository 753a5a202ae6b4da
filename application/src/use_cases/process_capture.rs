//! Process Capture use case
//!
//! Routes an uploaded capture to the gateway's vision-description or
//! audio-transcription capability and returns the extracted text. No retry
//! is attempted on gateway failure.

use crate::ports::completion_gateway::GatewayError;
use crate::ports::media_gateway::MediaGateway;
use std::sync::Arc;
use tracing::debug;

/// How an uploaded payload should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Vision,
    Audio,
}

impl CaptureKind {
    /// Map the request's `type` discriminator: `"vision"` selects the image
    /// path, anything else (including absence) is treated as audio.
    pub fn from_type_field(value: Option<&str>) -> Self {
        match value {
            Some("vision") => CaptureKind::Vision,
            _ => CaptureKind::Audio,
        }
    }
}

/// Input for the ProcessCapture use case
#[derive(Debug, Clone)]
pub struct ProcessCaptureInput {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub kind: CaptureKind,
}

/// Use case for turning captured media into idea text
pub struct ProcessCaptureUseCase<M: MediaGateway + ?Sized + 'static> {
    media: Arc<M>,
}

impl<M: MediaGateway + ?Sized + 'static> ProcessCaptureUseCase<M> {
    pub fn new(media: Arc<M>) -> Self {
        Self { media }
    }

    pub async fn execute(&self, input: ProcessCaptureInput) -> Result<String, GatewayError> {
        debug!(
            "Processing {} byte capture ({:?})",
            input.bytes.len(),
            input.kind
        );
        match input.kind {
            CaptureKind::Vision => self.media.describe_image(input.bytes).await,
            CaptureKind::Audio => {
                self.media
                    .transcribe_audio(input.bytes, &input.file_name)
                    .await
            }
        }
    }
}
