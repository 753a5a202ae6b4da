//! Infrastructure layer for critique
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the OpenAI-compatible hosted gateway client and
//! configuration file loading.

pub mod config;
pub mod openai;

// Re-export commonly used types
pub use config::{
    ApiCredential, ConfigLoader, FileConfig, FileCriticsConfig, FileGatewayConfig,
    FileServerConfig,
};
pub use openai::{error::OpenAiError, gateway::OpenAiGateway};
