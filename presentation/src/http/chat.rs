//! `/api/chat` relay handler
//!
//! Without a `criticNumber`, the prompt goes through one non-streaming
//! gateway call asking for the structured `{initial_query, my_analysis}`
//! document, returned verbatim as the response body. With a `criticNumber`
//! the prompt goes through one streaming call and every gateway delta is
//! re-framed as exactly one event in the configured wire framing.

use super::{AppState, encoder_for, error_body};
use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use critique_application::CompletionRequest;
use critique_domain::{
    CriticDescriptor, CriticIndex, CriticResponse, CritiquePrompt, Fragment, FragmentEncoder,
    Idea, StreamEvent,
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const CHAT_FAILED: &str = "Failed to process chat request";

/// Request body for `/api/chat`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Selects streaming critic mode; 1-based position in the panel
    #[serde(default)]
    pub critic_number: Option<usize>,
    /// Finished outputs of earlier critics, replayed into this one's context
    #[serde(default)]
    pub previous_responses: Vec<PreviousResponse>,
    #[serde(default)]
    pub stream: Option<bool>,
}

/// One earlier critic's output as the consumer echoes it back
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub critic_number: Option<usize>,
}

pub async fn handle_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> Response {
    let Ok(idea) = Idea::new(body.prompt.unwrap_or_default()) else {
        return error_body(StatusCode::BAD_REQUEST, "Prompt is required");
    };

    match body.critic_number {
        Some(number) => stream_critic(state, idea, number, body.previous_responses).await,
        None if body.stream == Some(true) => {
            stream_critic(state, idea, 1, body.previous_responses).await
        }
        None => single_shot(state, idea).await,
    }
}

async fn single_shot(state: AppState, idea: Idea) -> Response {
    debug!("Processing single-shot prompt");
    let request =
        CompletionRequest::new(CritiquePrompt::assistant_instruction(), idea.content()).structured();
    match state.completions.complete(&request).await {
        Ok(content) => content.into_response(),
        Err(e) => {
            warn!("Chat completion failed: {e}");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILED)
        }
    }
}

async fn stream_critic(
    state: AppState,
    idea: Idea,
    number: usize,
    previous: Vec<PreviousResponse>,
) -> Response {
    let critic: CriticDescriptor = match CriticIndex::new(number)
        .ok()
        .and_then(|index| state.panel.get(index))
    {
        Some(descriptor) => descriptor.clone(),
        None => {
            warn!("No critic at position {number}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILED);
        }
    };

    let previous: Vec<CriticResponse> = previous
        .into_iter()
        .map(|p| CriticResponse::new(p.content, p.reasoning))
        .collect();
    let request = CompletionRequest::new(
        CritiquePrompt::critic_system(&critic, &idea, &previous),
        idea.content(),
    );

    let handle = match state.completions.complete_streaming(&request).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!("Opening gateway stream failed: {e}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILED);
        }
    };
    debug!("Streaming critic {} commentary", critic.index);

    let ctx = StreamCtx {
        receiver: handle.receiver,
        encoder: encoder_for(state.framing),
        critic: critic.index,
        finished: false,
    };
    let frames = futures::stream::unfold(ctx, |mut ctx| async move {
        if ctx.finished {
            return None;
        }
        loop {
            let fragment = match ctx.receiver.recv().await {
                Some(StreamEvent::Delta(text)) => Fragment::text(text).with_critic(ctx.critic),
                Some(StreamEvent::ReasoningDelta(text)) => {
                    Fragment::reasoning(text).with_critic(ctx.critic)
                }
                // A closed channel without Completed still ends cleanly;
                // the consumer keeps whatever text already arrived.
                Some(StreamEvent::Completed(_)) | None => {
                    ctx.finished = true;
                    Fragment::Done
                }
                Some(StreamEvent::Error(e)) => {
                    warn!("Gateway stream failed mid-flight: {e}");
                    ctx.finished = true;
                    return Some((Err(std::io::Error::other(e)), ctx));
                }
            };
            match ctx.encoder.encode(&fragment) {
                Some(frame) => return Some((Ok(Bytes::from(frame)), ctx)),
                None if ctx.finished => return None,
                // Framing suppresses this fragment (empty delta); keep going
                None => continue,
            }
        }
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, state.framing.content_type())
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(frames));
    match response {
        Ok(response) => response,
        Err(e) => {
            warn!("Building stream response failed: {e}");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILED)
        }
    }
}

struct StreamCtx {
    receiver: mpsc::Receiver<StreamEvent>,
    encoder: Box<dyn FragmentEncoder>,
    critic: CriticIndex,
    finished: bool,
}

#[cfg(test)]
mod tests {
    use super::super::testing::{request_json, scripted_state};
    use axum::http::StatusCode;
    use critique_domain::{FramingMode, StreamEvent};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn missing_prompt_is_rejected_without_calling_the_gateway() {
        let (state, calls) = scripted_state(vec![], FramingMode::Sse);
        let router = crate::http::build_router(state);

        let response = router
            .oneshot(request_json("/api/chat", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"error":"Prompt is required"}"#);
        assert_eq!(calls.total(), 0);
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let (state, calls) = scripted_state(vec![], FramingMode::Sse);
        let router = crate::http::build_router(state);

        let response = router
            .oneshot(request_json("/api/chat", json!({"prompt": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.total(), 0);
    }

    #[tokio::test]
    async fn single_shot_returns_gateway_content_verbatim() {
        let (state, calls) = scripted_state(vec![], FramingMode::Sse);
        let router = crate::http::build_router(state);

        let response = router
            .oneshot(request_json("/api/chat", json!({"prompt": "a solar kettle"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            &body[..],
            br#"{"initial_query":"a solar kettle","my_analysis":"plausible"}"#
        );
        assert_eq!(calls.complete(), 1);
        assert_eq!(calls.streaming(), 0);
    }

    #[tokio::test]
    async fn streaming_sse_reframes_each_delta_and_ends_with_done() {
        let events = vec![
            StreamEvent::Delta("Too ".to_string()),
            StreamEvent::Delta("niche.".to_string()),
            StreamEvent::Completed("Too niche.".to_string()),
        ];
        let (state, calls) = scripted_state(events, FramingMode::Sse);
        let router = crate::http::build_router(state);

        let response = router
            .oneshot(request_json(
                "/api/chat",
                json!({"prompt": "a solar kettle", "criticNumber": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/event-stream"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let wire = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(
            wire,
            "data: {\"type\":\"text\",\"value\":\"Too \"}\n\n\
             data: {\"type\":\"text\",\"value\":\"niche.\"}\n\n\
             data: [DONE]\n\n"
        );
        assert_eq!(calls.streaming(), 1);
        assert_eq!(calls.complete(), 0);
    }

    #[tokio::test]
    async fn streaming_json_lines_has_no_sentinel_and_tags_the_critic() {
        let events = vec![
            StreamEvent::ReasoningDelta("hmm".to_string()),
            StreamEvent::Delta("Fine.".to_string()),
            StreamEvent::Completed("Fine.".to_string()),
        ];
        let (state, _calls) = scripted_state(events, FramingMode::JsonLines);
        let router = crate::http::build_router(state);

        let response = router
            .oneshot(request_json(
                "/api/chat",
                json!({"prompt": "a solar kettle", "criticNumber": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/x-ndjson"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let wire = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(
            wire,
            "{\"content\":\"\",\"reasoning\":\"hmm\",\"criticNumber\":2}\n\
             {\"content\":\"Fine.\",\"reasoning\":\"\",\"criticNumber\":2}\n"
        );
    }

    #[tokio::test]
    async fn previous_responses_reach_the_critic_prompt() {
        let events = vec![StreamEvent::Completed(String::new())];
        let (state, calls) = scripted_state(events, FramingMode::Sse);
        let router = crate::http::build_router(state);

        router
            .oneshot(request_json(
                "/api/chat",
                json!({
                    "prompt": "a solar kettle",
                    "criticNumber": 2,
                    "previousResponses": [
                        {"content": "too niche", "criticNumber": 1}
                    ]
                }),
            ))
            .await
            .unwrap();
        let system = calls.last_system();
        assert!(system.contains("--- Critic 1 ---\ntoo niche"));
        assert!(system.contains("a solar kettle"));
    }

    #[tokio::test]
    async fn pre_stream_failure_returns_500() {
        let (state, _calls) = scripted_state(vec![], FramingMode::Sse);
        let router = crate::http::build_router(state);

        // Critic 9 does not exist, so the stream never opens
        let response = router
            .oneshot(request_json(
                "/api/chat",
                json!({"prompt": "a solar kettle", "criticNumber": 9}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"error":"Failed to process chat request"}"#);
    }

    #[tokio::test]
    async fn mid_stream_failure_aborts_the_transport() {
        let events = vec![
            StreamEvent::Delta("par".to_string()),
            StreamEvent::Error("gateway hiccup".to_string()),
        ];
        let (state, _calls) = scripted_state(events, FramingMode::Sse);
        let router = crate::http::build_router(state);

        let response = router
            .oneshot(request_json(
                "/api/chat",
                json!({"prompt": "a solar kettle", "criticNumber": 1}),
            ))
            .await
            .unwrap();
        // Headers were already sent; the failure surfaces as a body error
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.into_body().collect().await.is_err());
    }
}
