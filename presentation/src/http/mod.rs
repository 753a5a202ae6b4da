//! Relay HTTP endpoints
//!
//! A thin HTTP surface over the gateway ports: `/api/chat` relays a prompt
//! to the completion gateway (single-shot or streaming) and `/api/transcribe`
//! turns an uploaded capture into idea text. Handlers never hold session
//! state; orchestration across critics belongs to the consumer.

pub mod chat;
pub mod transcribe;

#[cfg(test)]
pub(crate) mod testing;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use critique_application::{CompletionGateway, MediaGateway};
use critique_domain::{CriticPanel, FragmentEncoder, FramingMode, JsonLinesFraming, SseFraming};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for the relay handlers
#[derive(Clone)]
pub struct AppState {
    pub completions: Arc<dyn CompletionGateway>,
    pub media: Arc<dyn MediaGateway>,
    pub panel: Arc<CriticPanel>,
    pub framing: FramingMode,
}

impl AppState {
    pub fn new(
        completions: Arc<dyn CompletionGateway>,
        media: Arc<dyn MediaGateway>,
        panel: CriticPanel,
        framing: FramingMode,
    ) -> Self {
        Self {
            completions,
            media,
            panel: Arc::new(panel),
            framing,
        }
    }
}

/// Build the relay router
pub fn build_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/api/chat", post(chat::handle_chat))
        .route("/api/transcribe", post(transcribe::handle_transcribe))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) fn encoder_for(mode: FramingMode) -> Box<dyn FragmentEncoder> {
    match mode {
        FramingMode::Sse => Box::new(SseFraming::new()),
        FramingMode::JsonLines => Box::new(JsonLinesFraming::new()),
    }
}

pub(crate) fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
