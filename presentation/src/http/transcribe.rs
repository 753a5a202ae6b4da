//! `/api/transcribe` relay handler
//!
//! Accepts a multipart upload with a `file` part and an optional `type`
//! discriminator. `type == "vision"` routes to image description, anything
//! else to audio transcription; either way the extracted text comes back as
//! `{"text": ...}`.

use super::{AppState, error_body};
use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use critique_application::{CaptureKind, ProcessCaptureInput, ProcessCaptureUseCase};
use serde_json::json;
use tracing::{debug, warn};

pub async fn handle_transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut type_field: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("capture").to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((bytes.to_vec(), file_name)),
                    Err(e) => warn!("Reading upload failed: {e}"),
                }
            }
            Some("type") => type_field = field.text().await.ok(),
            _ => {}
        }
    }

    let Some((bytes, file_name)) = file else {
        return error_body(StatusCode::BAD_REQUEST, "No file provided");
    };

    let kind = CaptureKind::from_type_field(type_field.as_deref());
    debug!("Received {} byte capture ({kind:?})", bytes.len());

    let use_case = ProcessCaptureUseCase::new(state.media.clone());
    match use_case
        .execute(ProcessCaptureInput {
            bytes,
            file_name,
            kind,
        })
        .await
    {
        Ok(text) => Json(json!({ "text": text })).into_response(),
        Err(e) => {
            warn!("Capture processing failed: {e}");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Error processing file")
        }
    }
}
