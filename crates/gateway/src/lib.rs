//! HTTP transport for Switchboard.
//!
//! A thin axum surface over the orchestrator: every route delegates to one
//! pipeline operation and maps its outcome onto a JSON envelope. Pipeline
//! degradation is a 200 with flags; only body-level validation and
//! unrecoverable stage failures produce error statuses.

pub mod server;

pub use server::{AppState, GatewayConfig, GatewayServer};
