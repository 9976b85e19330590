//! Core type definitions for Switchboard.
//!
//! This module contains the fundamental data structures used across
//! the orchestrator pipeline.

pub mod intent;
pub mod interaction;
pub mod reply;
pub mod sector;
pub mod turn;

pub use intent::*;
pub use interaction::*;
pub use reply::*;
pub use sector::*;
pub use turn::*;
