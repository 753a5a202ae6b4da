//! Read-only view adapters
//!
//! Geometry and text projections of a transcript. Nothing here mutates
//! state; rendering itself happens in an external consumer.

pub mod formatter;
pub mod layout;
