//! Run Critics use case
//!
//! Orchestrates one critique session: critics `1..N` run strictly in
//! sequence, never concurrently, because critic `i`'s request embeds the
//! finished output of every critic before it. The chain is an explicit fold
//! over the panel — each step's future depends on the previous step's
//! resolved value.

use crate::ports::completion_gateway::{
    CompletionGateway, CompletionRequest, GatewayError, StreamHandle,
};
use crate::ports::transcript_observer::{NoObserver, TranscriptObserver};
use critique_domain::{
    CriticPanel, CriticResponse, CritiquePrompt, DomainError, Fragment, Idea, SessionTranscript,
    StreamAccumulator, StreamEvent,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a critique session
#[derive(Error, Debug)]
pub enum RunCriticsError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Session cancelled")]
    Cancelled,
}

/// Input for the RunCritics use case
#[derive(Debug, Clone)]
pub struct RunCriticsInput {
    /// The idea under critique
    pub idea: Idea,
    /// The configured critic roster
    pub panel: CriticPanel,
}

impl RunCriticsInput {
    pub fn new(idea: Idea, panel: CriticPanel) -> Self {
        Self { idea, panel }
    }
}

/// Use case for running the sequential critic chain
pub struct RunCriticsUseCase<G: CompletionGateway + 'static> {
    gateway: Arc<G>,
    /// Bound on each awaited stream step, so a hung gateway cannot stall
    /// a critic forever
    call_timeout: Option<Duration>,
}

impl<G: CompletionGateway + 'static> RunCriticsUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            call_timeout: None,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Execute the session with no observer and no cancellation
    pub async fn execute(&self, input: RunCriticsInput) -> Result<SessionTranscript, RunCriticsError> {
        self.execute_with_observer(input, &NoObserver, &CancellationToken::new())
            .await
    }

    /// Execute the session, publishing a snapshot after every accumulation
    /// step.
    ///
    /// Failure policy: skip and continue. A failed critic is completed with
    /// the error marker, contributes nothing to later critics' context, and
    /// the chain proceeds. Cancellation aborts the in-flight critic and
    /// stops the chain.
    pub async fn execute_with_observer(
        &self,
        input: RunCriticsInput,
        observer: &dyn TranscriptObserver,
        cancel: &CancellationToken,
    ) -> Result<SessionTranscript, RunCriticsError> {
        // A new query replaces the working transcript wholesale
        let mut transcript = SessionTranscript::begin(input.idea.content());
        observer.on_update(&transcript);

        info!("Starting critique session with {} critics", input.panel.len());

        let mut previous: Vec<CriticResponse> = Vec::new();

        for critic in input.panel.iter() {
            if cancel.is_cancelled() {
                return Err(RunCriticsError::Cancelled);
            }

            observer.on_critic_start(critic);
            debug!("Critic {} ({}) starting", critic.index, critic.display_name);

            let (with_pending, _) = transcript.push_pending(critic.index)?;
            let mut accumulator = StreamAccumulator::new(with_pending);
            observer.on_update(accumulator.snapshot());

            let request = CompletionRequest::new(
                CritiquePrompt::critic_system(critic, &input.idea, &previous),
                input.idea.content(),
            );

            match self
                .stream_one_critic(&request, &mut accumulator, observer, cancel)
                .await
            {
                Ok(()) => {
                    transcript = accumulator.snapshot().clone();
                    observer.on_update(&transcript);
                    observer.on_critic_complete(critic, true);
                    if let Some(message) = transcript.last_completed_critic() {
                        previous.push(CriticResponse::new(
                            message.content.clone(),
                            message.reasoning.clone(),
                        ));
                    }
                }
                Err(RunCriticsError::Cancelled) => {
                    transcript = accumulator.abort();
                    observer.on_update(&transcript);
                    return Err(RunCriticsError::Cancelled);
                }
                Err(e) => {
                    warn!("Critic {} failed: {}", critic.index, e);
                    transcript = accumulator.abort();
                    observer.on_update(&transcript);
                    observer.on_critic_complete(critic, false);
                }
            }
        }

        info!("Critique session complete");
        Ok(transcript)
    }

    /// Drive one critic's stream to Done, folding each event as it arrives.
    /// Ordering is preserved exactly as delivered by the gateway; a chunk
    /// is never processed while the previous one is still being folded.
    async fn stream_one_critic(
        &self,
        request: &CompletionRequest,
        accumulator: &mut StreamAccumulator,
        observer: &dyn TranscriptObserver,
        cancel: &CancellationToken,
    ) -> Result<(), RunCriticsError> {
        let mut handle = tokio::select! {
            _ = cancel.cancelled() => return Err(RunCriticsError::Cancelled),
            result = self.gateway.complete_streaming(request) => result?,
        };

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => return Err(RunCriticsError::Cancelled),
                event = self.next_event(&mut handle) => event?,
            };

            let Some(event) = event else {
                // Transport closed without a terminal event: keep the
                // partial content and mark the message Done.
                accumulator.apply(&Fragment::Done)?;
                return Ok(());
            };

            match event {
                StreamEvent::Delta(chunk) => {
                    observer.on_update(accumulator.apply(&Fragment::text(chunk))?);
                }
                StreamEvent::ReasoningDelta(chunk) => {
                    observer.on_update(accumulator.apply(&Fragment::reasoning(chunk))?);
                }
                StreamEvent::Completed(_) => {
                    accumulator.apply(&Fragment::Done)?;
                    return Ok(());
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e).into());
                }
            }
        }
    }

    /// One awaited stream step, bounded by the configured timeout
    async fn next_event(
        &self,
        handle: &mut StreamHandle,
    ) -> Result<Option<StreamEvent>, RunCriticsError> {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, handle.receiver.recv())
                .await
                .map_err(|_| RunCriticsError::Gateway(GatewayError::Timeout)),
            None => Ok(handle.receiver.recv().await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use critique_domain::session::ERROR_MARKER;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Gateway double that records every request and streams a scripted
    /// per-call response.
    struct ScriptedGateway {
        requests: Mutex<Vec<CompletionRequest>>,
        /// 1-based call number that fails before streaming begins
        fail_before_stream: Option<usize>,
        /// 1-based call number that errors after a partial delta
        fail_mid_stream: Option<usize>,
    }

    impl ScriptedGateway {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_before_stream: None,
                fail_mid_stream: None,
            }
        }

        fn failing_before_stream(call: usize) -> Self {
            Self {
                fail_before_stream: Some(call),
                ..Self::new()
            }
        }

        fn failing_mid_stream(call: usize) -> Self {
            Self {
                fail_mid_stream: Some(call),
                ..Self::new()
            }
        }

        fn record(&self, request: &CompletionRequest) -> usize {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        }

        fn recorded(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn response_text(call: usize) -> String {
            format!("verdict {call}")
        }
    }

    #[async_trait]
    impl CompletionGateway for ScriptedGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
            let call = self.record(request);
            Ok(Self::response_text(call))
        }

        async fn complete_streaming(
            &self,
            request: &CompletionRequest,
        ) -> Result<StreamHandle, GatewayError> {
            let call = self.record(request);
            if self.fail_before_stream == Some(call) {
                return Err(GatewayError::RequestFailed("upstream down".to_string()));
            }

            let (tx, rx) = mpsc::channel(8);
            let mid_stream_failure = self.fail_mid_stream == Some(call);
            tokio::spawn(async move {
                let text = Self::response_text(call);
                let (head, tail) = text.split_at(3);
                let _ = tx.send(StreamEvent::Delta(head.to_string())).await;
                if mid_stream_failure {
                    let _ = tx.send(StreamEvent::Error("stream broke".to_string())).await;
                    return;
                }
                let _ = tx
                    .send(StreamEvent::ReasoningDelta(format!("thinking {call}")))
                    .await;
                let _ = tx.send(StreamEvent::Delta(tail.to_string())).await;
                let _ = tx.send(StreamEvent::Completed(text)).await;
            });
            Ok(StreamHandle::new(rx))
        }
    }

    fn input(critics: usize) -> RunCriticsInput {
        RunCriticsInput::new(
            Idea::new("I want to build the next Apple").unwrap(),
            CriticPanel::with_default_roster(critics).unwrap(),
        )
    }

    #[tokio::test]
    async fn three_critics_produce_ordered_transcript() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunCriticsUseCase::new(Arc::clone(&gateway));

        let transcript = use_case.execute(input(3)).await.unwrap();

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.messages()[0].content, "I want to build the next Apple");
        for (i, message) in transcript.messages()[1..].iter().enumerate() {
            assert_eq!(message.critic.unwrap().get(), i + 1);
            assert!(!message.is_pending());
            assert_eq!(message.content, ScriptedGateway::response_text(i + 1));
            assert_eq!(message.reasoning_text(), format!("thinking {}", i + 1));
        }
        assert_eq!(gateway.recorded().len(), 3);
    }

    #[tokio::test]
    async fn critic_context_contains_exactly_prior_outputs() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunCriticsUseCase::new(Arc::clone(&gateway));

        use_case.execute(input(3)).await.unwrap();

        let requests = gateway.recorded();
        assert!(!requests[0].system.contains("Commentary from the critics"));
        for (i, request) in requests.iter().enumerate() {
            for call in 1..=3 {
                let included = request.system.contains(&ScriptedGateway::response_text(call));
                assert_eq!(included, call <= i, "request {} vs output {}", i + 1, call);
            }
        }
    }

    #[tokio::test]
    async fn failed_critic_is_skipped_and_chain_continues() {
        let gateway = Arc::new(ScriptedGateway::failing_before_stream(2));
        let use_case = RunCriticsUseCase::new(Arc::clone(&gateway));

        let transcript = use_case.execute(input(3)).await.unwrap();

        let critics: Vec<_> = transcript.messages()[1..].to_vec();
        assert_eq!(critics.len(), 3);
        assert_eq!(critics[1].content, ERROR_MARKER);
        assert!(!critics[1].is_pending());

        // Critic 3 sees critic 1's output but nothing from the failed critic
        let third_request = &gateway.recorded()[2];
        assert!(third_request.system.contains(&ScriptedGateway::response_text(1)));
        assert!(!third_request.system.contains(ERROR_MARKER));
    }

    #[tokio::test]
    async fn mid_stream_error_keeps_partial_content() {
        let gateway = Arc::new(ScriptedGateway::failing_mid_stream(1));
        let use_case = RunCriticsUseCase::new(Arc::clone(&gateway));

        let transcript = use_case.execute(input(2)).await.unwrap();

        let first = &transcript.messages()[1];
        assert_eq!(first.content, "ver");
        assert!(!first.is_pending());

        // The partial content is not threaded into the next critic
        assert!(!gateway.recorded()[1].system.contains("ver"));
    }

    #[tokio::test]
    async fn cancelled_before_start_issues_no_calls() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunCriticsUseCase::new(Arc::clone(&gateway));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = use_case
            .execute_with_observer(input(2), &NoObserver, &cancel)
            .await;

        assert!(matches!(result, Err(RunCriticsError::Cancelled)));
        assert!(gateway.recorded().is_empty());
    }

    #[tokio::test]
    async fn streamed_content_matches_single_shot() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunCriticsUseCase::new(Arc::clone(&gateway));

        let transcript = use_case.execute(input(1)).await.unwrap();
        let streamed = transcript.last_completed_critic().unwrap().content.clone();

        let single_shot = gateway
            .complete(&CompletionRequest::new("system", "prompt"))
            .await
            .unwrap();
        // Call numbering differs; shapes must match
        assert_eq!(streamed, ScriptedGateway::response_text(1));
        assert_eq!(single_shot, ScriptedGateway::response_text(2));
    }

    #[tokio::test]
    async fn snapshots_are_published_monotonically() {
        struct Recorder(Mutex<Vec<String>>);
        impl TranscriptObserver for Recorder {
            fn on_update(&self, transcript: &SessionTranscript) {
                let content = transcript
                    .messages()
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                self.0.lock().unwrap().push(content);
            }
        }

        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunCriticsUseCase::new(gateway);
        let recorder = Recorder(Mutex::new(Vec::new()));

        use_case
            .execute_with_observer(input(1), &recorder, &CancellationToken::new())
            .await
            .unwrap();

        let snapshots = recorder.0.lock().unwrap();
        let mut previous_len = 0;
        for snapshot in snapshots.iter().skip(1) {
            assert!(snapshot.len() >= previous_len, "content was retracted");
            previous_len = snapshot.len();
        }
        assert_eq!(snapshots.last().unwrap(), &ScriptedGateway::response_text(1));
    }
}
