//! Provider clients: LLM completion and embeddings via Rig, speech
//! endpoints over plain HTTP, and resilient wrappers for all three.

pub mod resilient;
pub mod rig_client;
pub mod synthesize;
pub mod transcribe;

pub use resilient::{ResilientLlmClient, ResilientSynthesizer, ResilientTranscriber};
pub use rig_client::{create_default_client, RigConfig, RigLlmClient, RigProvider};
pub use synthesize::HttpSynthesizer;
pub use transcribe::HttpTranscriber;
