//! Session integration tests
//!
//! Frame dispatch and reconnect behaviour through `Session`, without a socket.

use assert_matches::assert_matches;
use std::time::Duration;
use xfchat::shared::{ErrorKind, ServerEvent, SignalKind, SortOrder, UserId};

use crate::common::{connect, memory_service};

#[tokio::test]
async fn test_chat_round_trip_over_frames() {
    let (service, _store) = memory_service();
    let mut alice = connect(&service, "u1").await;
    let mut bob = connect(&service, "u2").await;

    alice
        .session
        .handle_frame(r#"{"event":"typing","data":{"recipientId":"u2"}}"#)
        .await;
    assert_matches!(bob.next_event().await, ServerEvent::IsTyping { sender_id, kind } => {
        assert_eq!(sender_id, UserId::from("u1"));
        assert_eq!(kind, SignalKind::Typing);
    });

    alice
        .session
        .handle_frame(r#"{"event":"sendMessage","data":{"recipientId":"u2","text":"hello"}}"#)
        .await;
    let sent = match alice.next_event().await {
        ServerEvent::MessageSent(m) => m,
        other => panic!("Expected messageSent, got {:?}", other),
    };
    assert_matches!(bob.next_event().await, ServerEvent::ReceiveMessage(m) => {
        assert_eq!(m.id, sent.id);
    });

    bob.session
        .handle_frame(r#"{"event":"getHistory","data":{"peerId":"u1","order":"desc"}}"#)
        .await;
    assert_matches!(bob.next_event().await, ServerEvent::ChatHistory(page) => {
        assert_eq!(page.order, SortOrder::Desc);
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].text, "hello");
    });
}

#[tokio::test]
async fn test_oversized_message_reported_to_sender_only() {
    let (service, store) = memory_service();
    let mut alice = connect(&service, "u1").await;
    let mut bob = connect(&service, "u2").await;

    let text = "x".repeat(service.limits().max_message_length + 1);
    let frame = serde_json::json!({
        "event": "sendMessage",
        "data": { "recipientId": "u2", "text": text },
    });
    alice.session.handle_frame(&frame.to_string()).await;

    assert_matches!(
        alice.next_event().await,
        ServerEvent::Error { kind: ErrorKind::Validation, .. }
    );
    bob.assert_idle();
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unknown_event_is_validation_error() {
    let (service, _store) = memory_service();
    let mut alice = connect(&service, "u1").await;

    alice
        .session
        .handle_frame(r#"{"event":"deleteEverything","data":{}}"#)
        .await;

    assert_matches!(
        alice.next_event().await,
        ServerEvent::Error { kind: ErrorKind::Validation, .. }
    );
}

#[tokio::test]
async fn test_reconnect_routes_to_newest_session() {
    let (service, _store) = memory_service();
    let mut first = connect(&service, "u2").await;
    let mut second = connect(&service, "u2").await;

    assert_matches!(first.next_event().await, ServerEvent::Superseded);

    // The superseded connection's disconnect arrives late
    assert!(!first.session.close());
    assert!(service.registry().is_online(&"u2".into()));

    service.send(&"u1".into(), &"u2".into(), "hi").await.unwrap();
    assert_matches!(second.next_event().await, ServerEvent::ReceiveMessage(_));
    first.assert_idle();
}

#[tokio::test]
async fn test_previews_on_reconnect_reflect_missed_messages() {
    let (service, _store) = memory_service();
    let bob = connect(&service, "u2").await;
    assert!(bob.previews.is_empty());
    bob.session.close();

    service.send(&"u1".into(), &"u2".into(), "one").await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    service.send(&"u3".into(), &"u2".into(), "two").await.unwrap();

    let bob = connect(&service, "u2").await;
    let peers: Vec<&str> = bob.previews.iter().map(|p| p.peer_id.as_str()).collect();
    assert_eq!(peers, vec!["u3", "u1"]);
}
