//! Integration tests for the chat HTTP API.
//!
//! Each test builds the full router over in-memory adapters and a mock
//! completion provider, then drives it with `tower::ServiceExt::oneshot`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use support_chat::adapters::ai::{MockAIProvider, MockError};
use support_chat::adapters::http::{build_router, AppState};
use support_chat::adapters::rate_limiter::InMemoryRateLimiter;
use support_chat::adapters::session_store::InMemorySessionStore;
use support_chat::application::ChatSettings;
use support_chat::config::{RateLimitConfig, ServerConfig};
use support_chat::domain::chat::FallbackKind;
use support_chat::domain::crisis::crisis_resources;
use support_chat::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_over(
    store: InMemorySessionStore,
    provider: MockAIProvider,
    rate_limit: RateLimitConfig,
    server: &ServerConfig,
) -> Router {
    let state = AppState {
        store: Arc::new(store),
        provider: Arc::new(provider),
        limiter: Arc::new(InMemoryRateLimiter::new(rate_limit)),
        settings: ChatSettings::default(),
    };
    build_router(state, server)
}

fn app_with(provider: MockAIProvider, rate_limit: RateLimitConfig) -> Router {
    app_over(
        InMemorySessionStore::new(),
        provider,
        rate_limit,
        &ServerConfig::default(),
    )
}

fn app(provider: MockAIProvider) -> Router {
    app_with(provider, RateLimitConfig::default())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn open_session(app: &Router) -> String {
    let (status, body) = send(app, post_json("/api/chat/init", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    body["sessionId"].as_str().unwrap().to_string()
}

// =============================================================================
// Session initialization
// =============================================================================

#[tokio::test]
async fn init_with_empty_body_returns_welcome() {
    let app = app(MockAIProvider::new().with_response("Welcome, I'm glad you're here."));

    let (status, body) = send(&app, post_json("/api/chat/init", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["sessionId"].as_str().unwrap().is_empty());
    assert_eq!(body["requiresCrisisPanel"], false);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "bot");
    assert_eq!(messages[0]["text"], "Welcome, I'm glad you're here.");
    assert!(!body["quickReplies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn init_in_crisis_adds_notice_and_panel() {
    let app = app(MockAIProvider::new().with_error(MockError::QuotaExceeded));

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/init",
            json!({ "userInfo": { "name": "Sam", "supportType": "crisis" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requiresCrisisPanel"], true);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["priority"], "high");
}

#[tokio::test]
async fn init_with_malformed_json_is_rejected() {
    let app = app(MockAIProvider::new());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat/init")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

// =============================================================================
// Messaging
// =============================================================================

#[tokio::test]
async fn message_returns_user_and_bot_pair() {
    let app = app(
        MockAIProvider::new()
            .with_response("Hello there.")
            .with_response("Let's try a slow breathing exercise together."),
    );
    let session_id = open_session(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": "I feel tense" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["sender"], "user");
    assert_eq!(messages[0]["text"], "I feel tense");
    assert_eq!(messages[1]["sender"], "bot");
    assert_eq!(body["requiresCrisisPanel"], false);
    assert!(!body["quickReplies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn crisis_message_skips_provider() {
    let provider = MockAIProvider::new().with_response("Hi.");
    let app = app(provider.clone());
    let session_id = open_session(&app).await;
    let calls_after_init = provider.call_count();

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": "I want to END IT ALL" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requiresCrisisPanel"], true);
    assert_eq!(body["messages"][1]["priority"], "critical");
    assert_eq!(provider.call_count(), calls_after_init);
}

#[tokio::test]
async fn provider_failure_still_answers() {
    let app = app(
        MockAIProvider::new()
            .with_response("Hi.")
            .with_error(MockError::QuotaExceeded),
    );
    let session_id = open_session(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": "rough day" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][1]["text"], FallbackKind::Technical.text());
    assert_eq!(body["requiresCrisisPanel"], false);
}

#[tokio::test]
async fn unknown_session_is_expired() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({
                "sessionId": "00000000-0000-4000-8000-000000000000",
                "message": "hello"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_EXPIRED");
}

#[tokio::test]
async fn missing_message_is_validation_error() {
    let app = app(MockAIProvider::new());
    let session_id = open_session(&app).await;

    let (status, body) = send(
        &app,
        post_json("/api/chat/message", json!({ "sessionId": session_id })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn blank_message_is_validation_error() {
    let app = app(MockAIProvider::new());
    let session_id = open_session(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": "   " }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let app = app(MockAIProvider::new());
    let session_id = open_session(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": "a".repeat(1001) }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MESSAGE_TOO_LARGE");
}

#[tokio::test]
async fn message_with_trailing_padding_over_limit_is_rejected() {
    let app = app(MockAIProvider::new());
    let session_id = open_session(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": format!("{}  ", "a".repeat(1000)) }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MESSAGE_TOO_LARGE");
}

#[tokio::test]
async fn swept_session_is_expired_for_transcript_and_messages() {
    let store = InMemorySessionStore::new();
    let app = app_over(
        store.clone(),
        MockAIProvider::new(),
        RateLimitConfig::default(),
        &ServerConfig::default(),
    );
    let session_id = open_session(&app).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.sweep(Duration::from_millis(10)).await.unwrap(), 1);

    let (status, body) = send(&app, get(&format!("/api/chat/{}", session_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_EXPIRED");

    let (status, body) = send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": "are you still there?" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_EXPIRED");
}

// =============================================================================
// Transcript, resources, health
// =============================================================================

#[tokio::test]
async fn transcript_lists_every_message_and_is_idempotent() {
    let app = app(MockAIProvider::new().with_response("Hi.").with_response("Okay."));
    let session_id = open_session(&app).await;
    send(
        &app,
        post_json(
            "/api/chat/message",
            json!({ "sessionId": session_id, "message": "hello" }),
        ),
    )
    .await;

    let uri = format!("/api/chat/{}", session_id);
    let (status, first) = send(&app, get(&uri)).await;
    let (_, second) = send(&app, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["session"]["id"], session_id);
    assert_eq!(first["session"]["messages"].as_array().unwrap().len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn transcript_for_unknown_session_is_404() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(&app, get("/api/chat/not-a-session")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_EXPIRED");
}

#[tokio::test]
async fn crisis_resources_are_listed() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(&app, get("/api/chat/crisis/resources")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["resources"].as_array().unwrap().len(),
        crisis_resources().len()
    );
}

#[tokio::test]
async fn health_counts_active_sessions() {
    let app = app(MockAIProvider::new());
    open_session(&app).await;

    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["activeSessions"], 1);
    assert_eq!(body["provider"], "mock");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(&app, get("/api/nowhere")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn posts_are_limited_per_client_ip() {
    let app = app_over(
        InMemorySessionStore::new(),
        MockAIProvider::new(),
        RateLimitConfig {
            requests_per_window: 2,
            ..Default::default()
        },
        &ServerConfig {
            trust_proxy_headers: true,
            ..Default::default()
        },
    );

    let request = |ip: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/api/chat/init")
            .header("content-type", "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from("{}"))
            .unwrap()
    };

    assert_eq!(send(&app, request("10.0.0.1")).await.0, StatusCode::OK);
    assert_eq!(send(&app, request("10.0.0.1")).await.0, StatusCode::OK);

    let response = app.clone().oneshot(request("10.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    assert_eq!(send(&app, request("10.0.0.2")).await.0, StatusCode::OK);

    let (status, _) = send(&app, get("/api/chat/crisis/resources")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn forwarded_for_is_ignored_unless_trusted() {
    let app = app_with(
        MockAIProvider::new(),
        RateLimitConfig {
            requests_per_window: 2,
            ..Default::default()
        },
    );
    let socket: SocketAddr = "203.0.113.9:40000".parse().unwrap();

    let mut statuses = Vec::new();
    for i in 0..4 {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri("/api/chat/init")
            .header("content-type", "application/json")
            .header("x-forwarded-for", format!("10.0.1.{}", i))
            .body(Body::from("{}"))
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(socket));
        statuses.push(app.clone().oneshot(request).await.unwrap().status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
}
