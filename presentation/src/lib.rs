//! Presentation layer for critique
//!
//! This crate contains the relay HTTP endpoints, the console transcript
//! observer, and read-only view adapters (layout geometry and plain-text
//! formatting).

pub mod console;
pub mod http;
pub mod view;

// Re-export commonly used types
pub use console::ConsoleObserver;
pub use http::{AppState, build_router};
pub use view::{formatter::TranscriptFormatter, layout::{CircularLayout, Slot}};
