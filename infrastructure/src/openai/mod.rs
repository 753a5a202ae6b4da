//! OpenAI-compatible gateway adapter

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod stream;
