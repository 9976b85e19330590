//! Turn pipeline for Switchboard.
//!
//! Sequences one conversational turn end to end:
//! 1. Resolve input text (decoding and transcribing audio off the async path)
//! 2. Classify the intent
//! 3. Dispatch to a handler through the routing table
//! 4. Persist the interaction (best effort)
//!
//! Every stage past transcription degrades instead of failing, so a turn
//! always produces a reply.

pub mod audio;
pub mod builder;
pub mod pipeline;

pub use audio::decode_audio_payload;
pub use builder::OrchestratorBuilder;
pub use pipeline::Orchestrator;
