//! Handler registry and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use switchboard_core::{Handler, HandlerContext, HandlerReply, LlmClient, SectorProfile};
use switchboard_observe::metrics::track_dispatch;

use crate::handlers::build_handlers;
use crate::table::RoutingTable;

/// One immutable routing configuration: table plus handler registry.
///
/// Dispatch works against an `Arc` snapshot of this, so swapping in a new
/// set never disturbs in-flight dispatches.
pub struct RouteSet {
    table: RoutingTable,
    handlers: HashMap<String, Arc<dyn Handler>>,
    sector: String,
}

impl RouteSet {
    /// Build the route set for a sector profile.
    pub fn from_sector(profile: &SectorProfile, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            table: RoutingTable::from_sector(profile),
            handlers: build_handlers(profile, llm),
            sector: profile.sector.clone(),
        }
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn handler_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn describe(&self, name: &str) -> String {
        match self.handlers.get(name) {
            Some(handler) => handler.describe(),
            None => format!("Tool '{}' not found", name),
        }
    }
}

fn unknown_intent_reply(intent: &str) -> HandlerReply {
    HandlerReply {
        response: format!(
            "I'm not sure how to help with '{}'. Could you please rephrase your request or ask for help?",
            intent
        ),
        success: false,
        error: None,
        data: Some(serde_json::json!({ "intent": intent })),
    }
}

/// Dispatches intents against the active route set.
pub struct Dispatcher {
    routes: RwLock<Arc<RouteSet>>,
}

impl Dispatcher {
    pub fn new(routes: RouteSet) -> Self {
        Self {
            routes: RwLock::new(Arc::new(routes)),
        }
    }

    /// The active route set. In-flight dispatches keep the snapshot they
    /// started with.
    pub async fn snapshot(&self) -> Arc<RouteSet> {
        Arc::clone(&*self.routes.read().await)
    }

    /// Atomically replace the active route set.
    pub async fn swap(&self, routes: RouteSet) {
        let sector = routes.sector.clone();
        *self.routes.write().await = Arc::new(routes);
        tracing::info!(sector = %sector, "route set swapped");
    }

    /// Route an intent to its handler and execute it.
    ///
    /// Never errors: handler faults become the apology envelope, a
    /// resolved tool missing from the registry becomes the unknown-intent
    /// envelope.
    pub async fn dispatch(&self, intent: &str, text: &str, ctx: &HandlerContext) -> HandlerReply {
        let routes = self.snapshot().await;
        let tool = routes.table.resolve(intent);
        tracing::info!(intent = %intent, tool = %tool, "routing to tool");

        let handler = match routes.handlers.get(tool) {
            Some(handler) => Arc::clone(handler),
            None => {
                tracing::warn!(intent = %intent, tool = %tool, "no handler registered for resolved tool");
                track_dispatch(tool, "unknown");
                return unknown_intent_reply(intent);
            }
        };

        match handler.execute(text, ctx).await {
            Ok(reply) => {
                let outcome = if reply.success { "success" } else { "failure" };
                track_dispatch(handler.name(), outcome);
                reply
            }
            Err(e) => {
                tracing::error!(error = %e, tool = %handler.name(), "handler execution failed");
                track_dispatch(handler.name(), "failure");
                HandlerReply::failure(
                    "I'm sorry, I encountered an error processing your request. Please try again.",
                    e.to_string(),
                )
            }
        }
    }

    /// Register (or replace) a handler, effective next dispatch.
    pub async fn add_handler(&self, name: &str, handler: Arc<dyn Handler>) {
        let mut routes = self.routes.write().await;
        let mut handlers = routes.handlers.clone();
        handlers.insert(name.to_string(), handler);

        *routes = Arc::new(RouteSet {
            table: routes.table.clone(),
            handlers,
            sector: routes.sector.clone(),
        });
        tracing::info!(tool = %name, "handler added");
    }

    /// Remove a handler, effective next dispatch.
    pub async fn remove_handler(&self, name: &str) {
        let mut routes = self.routes.write().await;
        let mut handlers = routes.handlers.clone();
        handlers.remove(name);

        *routes = Arc::new(RouteSet {
            table: routes.table.clone(),
            handlers,
            sector: routes.sector.clone(),
        });
        tracing::info!(tool = %name, "handler removed");
    }

    pub async fn list_handlers(&self) -> Vec<String> {
        self.snapshot().await.handler_names()
    }

    pub async fn describe_handler(&self, name: &str) -> String {
        self.snapshot().await.describe(name)
    }

    pub async fn sector(&self) -> String {
        self.snapshot().await.sector.clone()
    }
}
