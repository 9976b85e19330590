//! Persistence backends for Switchboard.
//!
//! This crate provides the interaction history (vector-indexed, over Qdrant or
//! an in-memory cosine index) and the TTL'd key-value cache (Redis or in-memory)
//! behind the trait boundaries defined in `switchboard_core`.

pub mod kv;
pub mod log;
pub mod memory;
pub mod qdrant;
pub mod redis;
pub mod retention;

pub use kv::MemoryKv;
pub use log::InteractionLog;
pub use memory::InMemoryIndex;
pub use qdrant::{QdrantConfig, QdrantIndex};
pub use redis::RedisKv;
pub use retention::RetentionPolicy;
