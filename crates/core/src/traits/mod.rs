//! Core trait definitions for Switchboard.
//!
//! Seams between the orchestrator and its providers, handlers, and stores.

pub mod handler;
pub mod llm;
pub mod speech;
pub mod store;

pub use handler::*;
pub use llm::*;
pub use speech::*;
pub use store::*;
