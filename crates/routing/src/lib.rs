//! Intent-to-handler routing.
//!
//! A sector profile defines the routing table and the handler set; the
//! dispatcher resolves classified intents against an atomically swappable
//! snapshot of both, so reconfiguration never disturbs in-flight turns.

pub mod dispatcher;
pub mod handlers;
pub mod table;

pub use dispatcher::{Dispatcher, RouteSet};
pub use handlers::{build_handlers, BookingHandler, InformationHandler, LlmHandler};
pub use table::RoutingTable;
