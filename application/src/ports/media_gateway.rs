//! Media gateway port
//!
//! Interface for the hosted audio-transcription and vision-description
//! capabilities used by the capture endpoint.

use crate::ports::completion_gateway::GatewayError;
use async_trait::async_trait;

/// Gateway for turning captured media into text
#[async_trait]
pub trait MediaGateway: Send + Sync {
    /// Transcribe an uploaded audio payload (language hinted as English)
    async fn transcribe_audio(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<String, GatewayError>;

    /// Describe the most prominent feature of an uploaded image, concisely
    async fn describe_image(&self, image: Vec<u8>) -> Result<String, GatewayError>;
}
