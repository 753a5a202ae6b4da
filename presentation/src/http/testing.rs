//! Shared test doubles for the relay handlers

use super::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use critique_application::{
    CompletionGateway, CompletionRequest, GatewayError, MediaGateway, StreamHandle,
};
use critique_domain::{CriticPanel, FramingMode, StreamEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Records gateway interactions for assertions
#[derive(Default)]
pub(crate) struct CallCounter {
    complete: AtomicUsize,
    streaming: AtomicUsize,
    last_system: Mutex<String>,
}

impl CallCounter {
    pub(crate) fn complete(&self) -> usize {
        self.complete.load(Ordering::SeqCst)
    }

    pub(crate) fn streaming(&self) -> usize {
        self.streaming.load(Ordering::SeqCst)
    }

    pub(crate) fn total(&self) -> usize {
        self.complete() + self.streaming()
    }

    pub(crate) fn last_system(&self) -> String {
        self.last_system.lock().unwrap().clone()
    }
}

/// Completion gateway that replays a scripted event sequence
struct ScriptedGateway {
    events: Mutex<Option<Vec<StreamEvent>>>,
    calls: Arc<CallCounter>,
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.calls.complete.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_system.lock().unwrap() = request.system.clone();
        Ok(format!(
            "{{\"initial_query\":\"{}\",\"my_analysis\":\"plausible\"}}",
            request.prompt
        ))
    }

    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<StreamHandle, GatewayError> {
        self.calls.streaming.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_system.lock().unwrap() = request.system.clone();
        let events = self
            .events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| GatewayError::Other("no scripted events left".to_string()))?;
        let (tx, rx) = mpsc::channel(events.len().max(1));
        tokio::spawn(async move {
            for event in events {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Ok(StreamHandle::new(rx))
    }
}

/// Media gateway with fixed answers, optionally failing
struct StubMedia {
    fail: bool,
}

#[async_trait]
impl MediaGateway for StubMedia {
    async fn transcribe_audio(
        &self,
        _audio: Vec<u8>,
        _file_name: &str,
    ) -> Result<String, GatewayError> {
        if self.fail {
            return Err(GatewayError::RequestFailed("scripted failure".to_string()));
        }
        Ok("a spoken idea".to_string())
    }

    async fn describe_image(&self, _image: Vec<u8>) -> Result<String, GatewayError> {
        if self.fail {
            return Err(GatewayError::RequestFailed("scripted failure".to_string()));
        }
        Ok("a red bicycle".to_string())
    }
}

fn build_state(
    events: Vec<StreamEvent>,
    framing: FramingMode,
    media_fails: bool,
) -> (AppState, Arc<CallCounter>) {
    let calls = Arc::new(CallCounter::default());
    let gateway = Arc::new(ScriptedGateway {
        events: Mutex::new(Some(events)),
        calls: calls.clone(),
    });
    let panel = CriticPanel::with_default_roster(3).unwrap();
    let state = AppState::new(
        gateway,
        Arc::new(StubMedia { fail: media_fails }),
        panel,
        framing,
    );
    (state, calls)
}

pub(crate) fn scripted_state(
    events: Vec<StreamEvent>,
    framing: FramingMode,
) -> (AppState, Arc<CallCounter>) {
    build_state(events, framing, false)
}

pub(crate) fn failing_media_state() -> AppState {
    build_state(vec![], FramingMode::Sse, true).0
}

pub(crate) fn request_json(path: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a multipart/form-data request by hand; each part is
/// `(name, file_name, bytes)`.
pub(crate) fn request_multipart(
    path: &str,
    parts: &[(&str, Option<&str>, &[u8])],
) -> Request<Body> {
    let boundary = "critique-test-boundary";
    let mut body = Vec::new();
    for (name, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}
