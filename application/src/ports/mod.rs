//! Port definitions (interfaces implemented by other layers)

pub mod completion_gateway;
pub mod media_gateway;
pub mod transcript_observer;
