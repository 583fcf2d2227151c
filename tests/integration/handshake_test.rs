//! HTTP handshake integration tests
//!
//! The upgrade endpoint must reject missing and invalid credentials with a
//! JSON 401 before any WebSocket negotiation takes place.

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::Value;

use crate::common::{forged_token_for, test_router, token_for};

fn create_test_server() -> TestServer {
    TestServer::new(test_router()).unwrap()
}

#[tokio::test]
async fn test_ws_without_credential_is_unauthorized() {
    let server = create_test_server();

    let response = server.get("/ws").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["status"], 401);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_ws_with_forged_token_is_unauthorized() {
    let server = create_test_server();
    let token = forged_token_for("u1");

    let response = server
        .get("/ws")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ws_with_garbage_query_token_is_unauthorized() {
    let server = create_test_server();

    let response = server.get("/ws").add_query_param("token", "garbage").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ws_with_valid_token_passes_handshake() {
    let server = create_test_server();
    let token = token_for("u1");

    // No upgrade headers, so the upgrade itself fails, but not on auth
    let response = server.get("/ws").add_query_param("token", &token).await;

    assert_ne!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_reports_online_count() {
    let server = create_test_server();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["online"], 0);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = create_test_server();

    let response = server.get("/nope").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["status"], 404);
}
