//! Intent handler traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{HandlerReply, IntentResult};

/// Per-invocation context passed to every handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerContext {
    /// Sector the dispatching routing table belongs to.
    pub sector: String,
    /// Requesting user, when known.
    pub user_id: Option<String>,
    /// Conversation session, when known.
    pub session_id: Option<String>,
    /// Classification that selected this handler, when dispatch ran one.
    pub intent: Option<IntentResult>,
}

/// Intent handler interface.
///
/// The closed capability set every tool implements; the dispatcher holds
/// handlers behind this trait and never downcasts.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Registered tool name.
    fn name(&self) -> &str;

    /// Human-readable description of what the handler does.
    fn describe(&self) -> String;

    /// Produce a reply for the user's text.
    async fn execute(&self, text: &str, ctx: &HandlerContext) -> Result<HandlerReply>;
}
