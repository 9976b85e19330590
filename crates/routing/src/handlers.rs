//! Built-in handlers.
//!
//! Handler construction is an explicit factory match over tool names:
//! booking and information have specialized implementations, everything
//! else is served by the generic LLM handler.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use switchboard_classifier::extract_json_object;
use switchboard_core::{Handler, HandlerContext, HandlerReply, LlmClient, Result, SectorProfile};

/// Generic LLM-backed handler for any tool without a specialized
/// implementation. LLM failure degrades to a canned per-tool reply that
/// still counts as handled.
pub struct LlmHandler {
    name: String,
    llm: Arc<dyn LlmClient>,
}

impl LlmHandler {
    pub fn new(name: impl Into<String>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            name: name.into(),
            llm,
        }
    }

    fn context_json(ctx: &HandlerContext) -> String {
        match &ctx.intent {
            Some(intent) => json!({
                "sector": ctx.sector,
                "intent": intent.intent,
                "entities": intent.entities,
            })
            .to_string(),
            None => "None".to_string(),
        }
    }
}

#[async_trait]
impl Handler for LlmHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        match self.name.as_str() {
            "booking" => "Handle booking and reservation requests".to_string(),
            "information" => "Provide information and details".to_string(),
            "reminder" => "Set up reminders and notifications".to_string(),
            "support" => "Provide customer support and assistance".to_string(),
            "notification" => "Send notifications and alerts".to_string(),
            "search" => "Search for information and resources".to_string(),
            "help" => "Provide help and guidance".to_string(),
            "greeting" => "Handle greetings and welcome messages".to_string(),
            "goodbye" => "Handle farewell and goodbye messages".to_string(),
            other => format!("Generic {} tool", other),
        }
    }

    async fn execute(&self, text: &str, ctx: &HandlerContext) -> Result<HandlerReply> {
        let system = format!("You are a helpful assistant specializing in {}.", self.name);
        let prompt = format!(
            "You are a helpful AI assistant handling {} requests.\n\n\
             User request: \"{}\"\n\
             Context: {}\n\n\
             Generate a helpful, professional response for this {} request.\n\
             Keep the response concise and actionable.",
            self.name,
            text,
            Self::context_json(ctx),
            self.name,
        );

        let response = match self.llm.complete(&system, &prompt).await {
            Ok(response) => response.trim().to_string(),
            Err(e) => {
                tracing::warn!(
                    tool = %self.name,
                    error = %e,
                    "LLM unavailable, serving canned response"
                );
                format!("I'm here to help with {}. How can I assist you?", self.name)
            }
        };

        Ok(HandlerReply::ok_with(response, json!({ "tool": self.name })))
    }
}

/// Booking handler: LLM slot extraction with defaulted slots and a
/// sector-flavored reply.
pub struct BookingHandler {
    sector: String,
    llm: Arc<dyn LlmClient>,
}

impl BookingHandler {
    pub fn new(sector: &str, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            sector: sector.to_string(),
            llm,
        }
    }

    /// Extract booking slots from the request. Any failure, upstream or
    /// parse, yields the default slot set.
    async fn extract_details(&self, text: &str) -> Value {
        let prompt = format!(
            "Extract booking details from this text: \"{}\"\n\n\
             Return a JSON object with:\n\
             - item_type: what is being booked\n\
             - date: booking date\n\
             - time: booking time\n\
             - quantity: number of items/people\n\
             - special_requests: any special requests",
            text
        );

        let defaults = || json!({ "item_type": "service", "date": "today", "time": "now" });

        match self
            .llm
            .complete(
                "You are a helpful assistant that extracts booking details.",
                &prompt,
            )
            .await
        {
            Ok(response) => extract_json_object(&response).unwrap_or_else(defaults),
            Err(e) => {
                tracing::warn!(error = %e, "booking detail extraction failed, using defaults");
                defaults()
            }
        }
    }

    fn respond(&self, details: &Value) -> String {
        let field = |key: &str, default: &str| -> String {
            details
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };

        match self.sector.as_str() {
            "hotel" => format!(
                "I can help you book a {} for {}. What type of room would you prefer?",
                field("item_type", "room"),
                field("date", "your preferred date")
            ),
            "hospital" => format!(
                "I can help you schedule an appointment for {} on {}. What department do you need?",
                field("item_type", "medical service"),
                field("date", "your preferred date")
            ),
            _ => format!(
                "I can help you book {} for {}. Please provide more details about your requirements.",
                field("item_type", "your service"),
                field("date", "your preferred date")
            ),
        }
    }
}

#[async_trait]
impl Handler for BookingHandler {
    fn name(&self) -> &str {
        "booking"
    }

    fn describe(&self) -> String {
        "Handle booking and reservation requests".to_string()
    }

    async fn execute(&self, text: &str, _ctx: &HandlerContext) -> Result<HandlerReply> {
        let details = self.extract_details(text).await;
        let response = self.respond(&details);
        Ok(HandlerReply::ok_with(
            response,
            json!({ "booking_details": details }),
        ))
    }
}

/// Information handler: canned sector response, no LLM involved.
pub struct InformationHandler {
    sector: String,
}

impl InformationHandler {
    pub fn new(sector: &str) -> Self {
        Self {
            sector: sector.to_string(),
        }
    }
}

#[async_trait]
impl Handler for InformationHandler {
    fn name(&self) -> &str {
        "information"
    }

    fn describe(&self) -> String {
        "Provide information and details".to_string()
    }

    async fn execute(&self, text: &str, _ctx: &HandlerContext) -> Result<HandlerReply> {
        let response = match self.sector.as_str() {
            "hotel" => {
                "I can provide information about our rooms, amenities, dining options, and services. What would you like to know?"
            }
            "hospital" => {
                "I can provide information about our departments, visiting hours, emergency services, and appointment scheduling. What would you like to know?"
            }
            _ => "I can provide information about our services and offerings. What would you like to know?",
        };

        Ok(HandlerReply::ok_with(
            response,
            json!({ "info_request": { "topic": "general", "query": text } }),
        ))
    }
}

/// Instantiate the handler set for a sector profile.
pub fn build_handlers(
    profile: &SectorProfile,
    llm: Arc<dyn LlmClient>,
) -> HashMap<String, Arc<dyn Handler>> {
    let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
    for tool in &profile.available_tools {
        let handler: Arc<dyn Handler> = match tool.as_str() {
            "booking" => Arc::new(BookingHandler::new(&profile.sector, Arc::clone(&llm))),
            "information" => Arc::new(InformationHandler::new(&profile.sector)),
            other => Arc::new(LlmHandler::new(other, Arc::clone(&llm))),
        };
        tracing::debug!(tool = %tool, sector = %profile.sector, "registered handler");
        handlers.insert(tool.clone(), handler);
    }
    handlers
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::mocks::MockLlm;

    fn ctx() -> HandlerContext {
        HandlerContext::default()
    }

    #[tokio::test]
    async fn llm_handler_uses_model_response() {
        let llm = Arc::new(MockLlm::constant("Happy to help with your search."));
        let handler = LlmHandler::new("search", llm);

        let reply = handler.execute("find a pharmacy", &ctx()).await.unwrap();

        assert!(reply.success);
        assert_eq!(reply.response, "Happy to help with your search.");
        assert_eq!(reply.data.unwrap()["tool"], "search");
    }

    #[tokio::test]
    async fn llm_handler_degrades_to_canned_reply() {
        let llm = Arc::new(MockLlm::failing());
        let handler = LlmHandler::new("booking", llm);

        let reply = handler.execute("book something", &ctx()).await.unwrap();

        // Degradation still counts as handled.
        assert!(reply.success);
        assert_eq!(
            reply.response,
            "I'm here to help with booking. How can I assist you?"
        );
    }

    #[tokio::test]
    async fn booking_handler_extracts_details() {
        let llm = Arc::new(MockLlm::constant(
            r#"{"item_type": "room", "date": "tomorrow", "time": "3pm", "quantity": 2}"#,
        ));
        let handler = BookingHandler::new("hotel", llm);

        let reply = handler.execute("book a room for two", &ctx()).await.unwrap();

        assert!(reply.success);
        assert_eq!(
            reply.response,
            "I can help you book a room for tomorrow. What type of room would you prefer?"
        );
        let details = &reply.data.unwrap()["booking_details"];
        assert_eq!(details["quantity"], 2);
    }

    #[tokio::test]
    async fn booking_handler_defaults_when_extraction_fails() {
        let llm = Arc::new(MockLlm::failing());
        let handler = BookingHandler::new("generic", llm);

        let reply = handler.execute("book whatever", &ctx()).await.unwrap();

        assert!(reply.success);
        assert_eq!(
            reply.response,
            "I can help you book service for today. Please provide more details about your requirements."
        );
    }

    #[tokio::test]
    async fn booking_handler_sector_flavors_the_reply() {
        let llm = Arc::new(MockLlm::constant(r#"{"item_type": "checkup"}"#));
        let handler = BookingHandler::new("hospital", llm);

        let reply = handler.execute("I need a checkup", &ctx()).await.unwrap();

        assert!(reply.response.contains("What department do you need?"));
        assert!(reply.response.contains("checkup"));
    }

    #[tokio::test]
    async fn information_handler_is_canned_per_sector() {
        let hotel = InformationHandler::new("hotel");
        let reply = hotel.execute("what about wifi?", &ctx()).await.unwrap();

        assert!(reply.success);
        assert!(reply.response.contains("amenities"));
        assert_eq!(reply.data.unwrap()["info_request"]["query"], "what about wifi?");

        let generic = InformationHandler::new("generic");
        let reply = generic.execute("hours?", &ctx()).await.unwrap();
        assert!(reply.response.contains("services and offerings"));
    }

    #[tokio::test]
    async fn factory_builds_specialized_and_generic_handlers() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());
        let profile = SectorProfile::generic();

        let handlers = build_handlers(&profile, llm);

        assert_eq!(handlers.len(), profile.available_tools.len());

        // The booking slot goes to the specialized handler: even with the
        // LLM down it answers with booking defaults, not the generic
        // canned line.
        let reply = handlers["booking"]
            .execute("book it", &ctx())
            .await
            .unwrap();
        assert!(reply.response.starts_with("I can help you book"));

        let reply = handlers["reminder"].execute("remind me", &ctx()).await.unwrap();
        assert_eq!(
            reply.response,
            "I'm here to help with reminder. How can I assist you?"
        );
    }

    #[test]
    fn descriptions_cover_known_tools() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());

        assert_eq!(
            LlmHandler::new("help", Arc::clone(&llm)).describe(),
            "Provide help and guidance"
        );
        assert_eq!(
            LlmHandler::new("concierge", llm).describe(),
            "Generic concierge tool"
        );
    }
}
