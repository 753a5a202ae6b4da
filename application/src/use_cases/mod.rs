//! Application use cases

pub mod process_capture;
pub mod run_critics;
