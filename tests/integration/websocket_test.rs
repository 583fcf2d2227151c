//! WebSocket end-to-end tests
//!
//! Real sockets over a random local port.

use axum_test::{TestServer, TestWebSocket};
use serde_json::{json, Value};

use crate::common::{test_router, token_for};

fn create_ws_server() -> TestServer {
    TestServer::builder()
        .http_transport()
        .build(test_router())
        .unwrap()
}

async fn open(server: &TestServer, user: &str) -> TestWebSocket {
    server
        .get_websocket(&format!("/ws?token={}", token_for(user)))
        .await
        .into_websocket()
        .await
}

#[tokio::test]
async fn test_first_frame_is_preview_list() {
    let server = create_ws_server();
    let mut socket = open(&server, "u1").await;

    let frame: Value = socket.receive_json().await;

    assert_eq!(frame["event"], "previewList");
    assert_eq!(frame["data"]["previews"], json!([]));
}

#[tokio::test]
async fn test_message_delivered_between_sockets() {
    let server = create_ws_server();
    let mut alice = open(&server, "u1").await;
    let mut bob = open(&server, "u2").await;
    let _: Value = alice.receive_json().await;
    let _: Value = bob.receive_json().await;

    alice
        .send_json(&json!({
            "event": "sendMessage",
            "data": { "recipientId": "u2", "text": "hi bob" },
        }))
        .await;

    let ack: Value = alice.receive_json().await;
    assert_eq!(ack["event"], "messageSent");
    assert_eq!(ack["data"]["text"], "hi bob");

    let pushed: Value = bob.receive_json().await;
    assert_eq!(pushed["event"], "receiveMessage");
    assert_eq!(pushed["data"]["senderId"], "u1");
    assert_eq!(pushed["data"]["id"], ack["data"]["id"]);
}

#[tokio::test]
async fn test_second_login_supersedes_first() {
    let server = create_ws_server();
    let mut first = open(&server, "u1").await;
    let _: Value = first.receive_json().await;

    let mut second = open(&server, "u1").await;
    let _: Value = second.receive_json().await;

    let frame: Value = first.receive_json().await;
    assert_eq!(frame["event"], "superseded");
}
