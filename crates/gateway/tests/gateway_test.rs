//! Endpoint tests over the in-process router, mock providers behind it.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::Engine;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use switchboard_core::mocks::{MockLlm, MockSynthesizer, MockTranscriber};
use switchboard_core::types::SectorProfile;
use switchboard_gateway::{GatewayConfig, GatewayServer};
use switchboard_orchestrator::Orchestrator;
use tower::ServiceExt;

fn classification(intent: &str, confidence: f64) -> String {
    format!(
        r#"{{"intent": "{}", "confidence": {}, "entities": {{}}, "context": "scripted"}}"#,
        intent, confidence
    )
}

/// Scripted completions for one hotel booking turn: classify, then slot
/// extraction.
fn hotel_llm() -> Arc<MockLlm> {
    Arc::new(MockLlm::new(vec![
        classification("room_booking", 0.95),
        r#"{"item_type": "room", "date": "Friday", "time": "3pm"}"#.to_string(),
    ]))
}

fn hotel_app() -> Router {
    let orchestrator = Orchestrator::builder()
        .with_llm(hotel_llm())
        .with_profile(SectorProfile::hotel())
        .build()
        .unwrap();
    GatewayServer::new(GatewayConfig::default(), Arc::new(orchestrator)).build_router()
}

fn generic_app(llm: Arc<MockLlm>) -> Router {
    let orchestrator = Orchestrator::builder().with_llm(llm).build().unwrap();
    GatewayServer::new(GatewayConfig::default(), Arc::new(orchestrator)).build_router()
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_component_readiness() {
    let orchestrator = Orchestrator::builder()
        .with_llm(Arc::new(MockLlm::constant("ok")))
        .with_transcriber(Arc::new(MockTranscriber::new("hi")))
        .build()
        .unwrap();
    let app = GatewayServer::new(GatewayConfig::default(), Arc::new(orchestrator)).build_router();

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sector"], "generic");
    assert_eq!(body["transcription"], true);
    assert_eq!(body["synthesis"], false);
}

#[tokio::test]
async fn turn_endpoint_runs_the_pipeline() {
    let app = hotel_app();

    let (status, body) = post_json(
        app,
        "/v1/turn",
        json!({"text": "I want to book a room", "user_id": "u1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "text");
    assert_eq!(body["sector"], "hotel");
    assert_eq!(body["intent"]["intent"], "room_booking");
    assert_eq!(body["reply"]["success"], true);
    assert!(body["interaction_id"].as_str().is_some());
}

#[tokio::test]
async fn empty_turn_input_is_rejected() {
    let app = hotel_app();

    let (status, body) = post_json(app, "/v1/turn", json!({"text": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn unrecognized_turn_body_is_a_client_error() {
    let app = hotel_app();

    let (status, _) = post_json(app, "/v1/turn", json!({"volume": 11})).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn intent_endpoint_includes_catalog_description() {
    let app = hotel_app();

    let (status, body) = post_json(app, "/v1/intent", json!({"text": "book a room please"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "room_booking");
    assert_eq!(body["confidence"], 0.95);
    assert_eq!(body["description"], "Book hotel rooms and check availability");
}

#[tokio::test]
async fn dispatch_routes_a_preclassified_intent() {
    let app = generic_app(Arc::new(MockLlm::constant("Welcome aboard!")));

    let (status, body) = post_json(
        app,
        "/v1/dispatch",
        json!({"intent": "greeting", "text": "hello there"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "Welcome aboard!");
}

#[tokio::test]
async fn handler_list_and_detail_endpoints() {
    let app = generic_app(Arc::new(MockLlm::constant("ok")));

    let (status, body) = get_json(app.clone(), "/v1/handlers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sector"], "generic");
    let handlers = body["handlers"].as_array().unwrap();
    assert!(handlers.iter().any(|h| h == "booking"));

    let (status, body) = get_json(app.clone(), "/v1/handlers/booking").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Handle booking and reservation requests");

    let (status, body) = get_json(app, "/v1/handlers/telepathy").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "handler_not_found");
}

#[tokio::test]
async fn sector_swaps_by_catalog_name_and_inline_profile() {
    let app = generic_app(Arc::new(MockLlm::constant("ok")));

    let (status, body) = get_json(app.clone(), "/v1/sector").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sector"], "generic");

    let (status, body) = post_json(app.clone(), "/v1/sector", json!({"name": "hotel"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sector"], "hotel");
    let tools = body["tools"].as_array().unwrap();
    assert!(tools.iter().any(|t| t == "room_service"));

    let (status, body) = post_json(app.clone(), "/v1/sector", json!({"name": "bank"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let inline = json!({
        "sector": "kiosk",
        "available_tools": ["help"],
        "intent_mapping": [{"tool": "help", "keywords": ["help"]}]
    });
    let (status, body) = post_json(app, "/v1/sector", inline).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sector"], "kiosk");
    assert_eq!(body["tools"], json!(["help"]));
}

#[tokio::test]
async fn memory_endpoints_round_trip_a_stored_turn() {
    let app = hotel_app();

    let (status, _) = post_json(
        app.clone(),
        "/v1/turn",
        json!({"text": "I want to book a room", "user_id": "u1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(app.clone(), "/v1/memory/u1?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    let interactions = body["interactions"].as_array().unwrap();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0]["intent"], "room_booking");

    let (status, body) = post_json(
        app.clone(),
        "/v1/memory/search",
        json!({"query": "I want to book a room", "user_id": "u1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["interaction"]["content"], "I want to book a room");

    // Everything stored is inside the retention window.
    let (status, body) = post_json(app, "/v1/memory/prune", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn speak_returns_encoded_audio() {
    let orchestrator = Orchestrator::builder()
        .with_llm(Arc::new(MockLlm::constant("ok")))
        .with_synthesizer(Arc::new(MockSynthesizer::new()))
        .build()
        .unwrap();
    let app = GatewayServer::new(GatewayConfig::default(), Arc::new(orchestrator)).build_router();

    let (status, body) = post_json(app, "/v1/speak", json!({"text": "Your room is booked."})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["synthesized"], true);
    let audio = base64::engine::general_purpose::STANDARD
        .decode(body["audio"].as_str().unwrap())
        .unwrap();
    assert!(audio.starts_with(b"RIFF"));
}

#[tokio::test]
async fn speak_degrades_to_text_only_without_a_synthesizer() {
    let app = generic_app(Arc::new(MockLlm::constant("ok")));

    let (status, body) = post_json(app, "/v1/speak", json!({"text": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["synthesized"], false);
    assert!(body["audio"].is_null());
    assert_eq!(body["text"], "hello");
}

#[tokio::test]
async fn metrics_route_is_present_only_when_installed() {
    let bare = generic_app(Arc::new(MockLlm::constant("ok")));
    let response = bare
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let orchestrator = Orchestrator::builder()
        .with_llm(Arc::new(MockLlm::constant("ok")))
        .build()
        .unwrap();
    let recorder = PrometheusBuilder::new().build_recorder();
    let app = GatewayServer::new(GatewayConfig::default(), Arc::new(orchestrator))
        .with_metrics(recorder.handle())
        .build_router();

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
