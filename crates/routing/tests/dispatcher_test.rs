//! Dispatch behavior across route sets.

use std::sync::Arc;

use switchboard_core::mocks::{FailingHandler, MockLlm, RecordingHandler};
use switchboard_core::{HandlerContext, LlmClient, RoutingEntry, SectorProfile};
use switchboard_routing::{Dispatcher, RouteSet};

fn ctx() -> HandlerContext {
    HandlerContext::default()
}

#[tokio::test]
async fn room_booking_intent_reaches_the_booking_handler() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::constant(
        r#"{"item_type": "room", "date": "Friday"}"#,
    ));
    let dispatcher = Dispatcher::new(RouteSet::from_sector(&SectorProfile::hotel(), llm));

    let reply = dispatcher
        .dispatch("room_booking", "I want to book a room", &ctx())
        .await;

    assert!(reply.success);
    assert_eq!(
        reply.response,
        "I can help you book a room for Friday. What type of room would you prefer?"
    );
}

#[tokio::test]
async fn unmatched_intent_goes_to_help() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());
    let dispatcher = Dispatcher::new(RouteSet::from_sector(&SectorProfile::generic(), llm));

    let reply = dispatcher.dispatch("xyz123", "gibberish", &ctx()).await;

    assert!(reply.success);
    assert_eq!(
        reply.response,
        "I'm here to help with help. How can I assist you?"
    );
}

#[tokio::test]
async fn resolved_tool_without_handler_yields_unknown_envelope() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());
    let profile = SectorProfile {
        sector: "custom".to_string(),
        available_tools: vec!["help".to_string()],
        intent_mapping: vec![RoutingEntry {
            tool: "billing".to_string(),
            keywords: vec!["invoice".to_string()],
        }],
    };
    let dispatcher = Dispatcher::new(RouteSet::from_sector(&profile, llm));

    let reply = dispatcher
        .dispatch("invoice", "send my invoice", &ctx())
        .await;

    assert!(!reply.success);
    assert!(reply
        .response
        .contains("I'm not sure how to help with 'invoice'"));
    assert!(reply.error.is_none());
    assert_eq!(reply.data.unwrap()["intent"], "invoice");
}

#[tokio::test]
async fn handler_error_becomes_apology_envelope() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());
    let dispatcher = Dispatcher::new(RouteSet::from_sector(&SectorProfile::generic(), llm));
    dispatcher
        .add_handler("search", Arc::new(FailingHandler::new("search")))
        .await;

    let reply = dispatcher.dispatch("find", "find my keys", &ctx()).await;

    assert!(!reply.success);
    assert_eq!(
        reply.response,
        "I'm sorry, I encountered an error processing your request. Please try again."
    );
    assert!(reply.error.unwrap().contains("mock handler failure"));
}

#[tokio::test]
async fn added_handler_takes_over_next_dispatch() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());
    let dispatcher = Dispatcher::new(RouteSet::from_sector(&SectorProfile::generic(), llm));

    let recorder = Arc::new(RecordingHandler::new(
        "search",
        "Recording search",
        "found it",
    ));
    dispatcher.add_handler("search", recorder.clone()).await;

    let reply = dispatcher.dispatch("find", "find my booking", &ctx()).await;
    assert_eq!(reply.response, "found it");
    assert_eq!(recorder.calls(), vec!["find my booking"]);

    dispatcher.remove_handler("search").await;
    let reply = dispatcher.dispatch("find", "find it again", &ctx()).await;
    assert!(!reply.success);
    assert!(reply
        .response
        .contains("I'm not sure how to help with 'find'"));
}

#[tokio::test]
async fn swap_replaces_sector_atomically() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());
    let dispatcher =
        Dispatcher::new(RouteSet::from_sector(&SectorProfile::hotel(), Arc::clone(&llm)));
    assert_eq!(dispatcher.sector().await, "hotel");

    dispatcher
        .swap(RouteSet::from_sector(&SectorProfile::hospital(), llm))
        .await;

    assert_eq!(dispatcher.sector().await, "hospital");
    let reply = dispatcher
        .dispatch("appointment_booking", "book a visit", &ctx())
        .await;
    assert!(reply.response.contains("What department do you need?"));
}

#[tokio::test]
async fn list_and_describe_handlers() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::failing());
    let dispatcher = Dispatcher::new(RouteSet::from_sector(&SectorProfile::generic(), llm));

    let names = dispatcher.list_handlers().await;
    assert_eq!(names.len(), 9);
    assert!(names.contains(&"booking".to_string()));

    assert_eq!(
        dispatcher.describe_handler("information").await,
        "Provide information and details"
    );
    assert_eq!(
        dispatcher.describe_handler("nonexistent").await,
        "Tool 'nonexistent' not found"
    );
}
