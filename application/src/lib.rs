//! Application layer for critique
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; adapters for the hosted gateway live in the
//! infrastructure crate.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    completion_gateway::{CompletionGateway, CompletionRequest, GatewayError, StreamHandle},
    media_gateway::MediaGateway,
    transcript_observer::{NoObserver, TranscriptObserver},
};
pub use use_cases::process_capture::{CaptureKind, ProcessCaptureInput, ProcessCaptureUseCase};
pub use use_cases::run_critics::{RunCriticsError, RunCriticsInput, RunCriticsUseCase};
