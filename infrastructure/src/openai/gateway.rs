//! Hosted gateway client
//!
//! Implements the [`CompletionGateway`] and [`MediaGateway`] ports against
//! an OpenAI-compatible HTTP API: chat completions (single-shot and
//! streaming), audio transcription, and vision description.

use crate::config::{ApiCredential, FileGatewayConfig};
use crate::openai::error::{OpenAiError, Result};
use crate::openai::protocol::{
    ChatRequest, ChatResponse, ContentPart, ImageUrl, ResponseFormat, TranscriptionResponse,
    WireMessage,
};
use crate::openai::stream::{EventStreamParser, GatewayDelta};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use critique_application::{
    CompletionGateway, CompletionRequest, GatewayError, MediaGateway, StreamHandle,
};
use critique_domain::StreamEvent;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Instruction for the vision path
const VISION_INSTRUCTION: &str =
    "Show me the most prominent feature of this image. Be concise and to the point.";

/// Output bound for vision descriptions
const VISION_MAX_TOKENS: u32 = 500;

/// Client for the hosted completion/transcription/vision API
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: FileGatewayConfig,
    credential: ApiCredential,
}

impl OpenAiGateway {
    pub fn new(config: FileGatewayConfig, credential: ApiCredential) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            config,
            credential,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST a chat request; the overall timeout is only applied to
    /// non-streaming calls, since a healthy stream may legitimately outlive
    /// it.
    async fn send_chat(&self, request: &ChatRequest, streaming: bool) -> Result<reqwest::Response> {
        let mut builder = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(self.credential.reveal())
            .json(request);
        if !streaming {
            builder = builder.timeout(self.config.request_timeout());
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gateway returned {}", status);
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn first_choice_content(response: reqwest::Response) -> Result<String> {
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OpenAiError::MalformedResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OpenAiError::MalformedResponse("no choices in completion".to_string()))
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, GatewayError> {
        let chat = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                WireMessage::system(request.system.as_str()),
                WireMessage::user(request.prompt.as_str()),
            ],
            stream: None,
            max_tokens: None,
            response_format: request.structured.then(ResponseFormat::response_data),
        };
        let response = self.send_chat(&chat, false).await?;
        Ok(Self::first_choice_content(response).await?)
    }

    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<StreamHandle, GatewayError> {
        let chat = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                WireMessage::system(request.system.as_str()),
                WireMessage::user(request.prompt.as_str()),
            ],
            stream: Some(true),
            max_tokens: None,
            response_format: None,
        };
        let response = self.send_chat(&chat, true).await?;
        debug!("Gateway stream opened");

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut parser = EventStreamParser::new();
            let mut full_text = String::new();
            let mut done = false;

            while let Some(next) = stream.next().await {
                let chunk = match next {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                for delta in parser.feed(&chunk) {
                    match delta {
                        GatewayDelta::Content(text) => {
                            full_text.push_str(&text);
                            if tx.send(StreamEvent::Delta(text)).await.is_err() {
                                return;
                            }
                        }
                        GatewayDelta::Reasoning(text) => {
                            if tx.send(StreamEvent::ReasoningDelta(text)).await.is_err() {
                                return;
                            }
                        }
                        GatewayDelta::Done => done = true,
                    }
                }
                if done {
                    break;
                }
            }
            // Sentinel or transport close both end the stream
            let _ = tx.send(StreamEvent::Completed(full_text)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

#[async_trait]
impl MediaGateway for OpenAiGateway {
    async fn transcribe_audio(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> std::result::Result<String, GatewayError> {
        let part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/webm")
            .map_err(|e| GatewayError::Other(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone())
            .text("language", "en");

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(self.credential.reveal())
            .multipart(form)
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(OpenAiError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Transcription failed with {}", status);
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| OpenAiError::MalformedResponse(e.to_string()))?;
        Ok(parsed.text)
    }

    async fn describe_image(&self, image: Vec<u8>) -> std::result::Result<String, GatewayError> {
        let encoded = BASE64.encode(&image);
        let chat = ChatRequest {
            model: self.config.vision_model.clone(),
            messages: vec![WireMessage::user_parts(vec![
                ContentPart::Text {
                    text: VISION_INSTRUCTION.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/jpeg;base64,{encoded}"),
                    },
                },
            ])],
            stream: None,
            max_tokens: Some(VISION_MAX_TOKENS),
            response_format: None,
        };
        let response = self.send_chat(&chat, false).await?;
        Ok(Self::first_choice_content(response).await?)
    }
}
