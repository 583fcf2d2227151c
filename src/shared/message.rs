/**
 * Message Data Structures
 *
 * This module defines the identity, message and preview types that flow
 * between the delivery pipeline, the durable store and connected clients.
 *
 * All types serialize with camelCase field names, which is the shape the
 * WebSocket protocol exposes to clients.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque user identity
///
/// Produced by the authentication handshake from the credential subject and
/// immutable for the lifetime of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A persisted direct message
///
/// Created exactly once by the store's persist step and immutable after that.
/// The `id` and `sent_at` fields are assigned server-side.
///
/// # Example
/// ```rust
/// use xfchat::shared::{Message, UserId};
///
/// let message = Message {
///     id: uuid::Uuid::new_v4(),
///     sender_id: UserId::from("u1"),
///     recipient_id: UserId::from("u2"),
///     text: "hi".to_string(),
///     sent_at: chrono::Utc::now(),
/// };
/// assert!(message.involves(&UserId::from("u2")));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Identity of the author
    pub sender_id: UserId,
    /// Identity of the addressee
    pub recipient_id: UserId,
    /// Message body
    pub text: String,
    /// Server-assigned send time
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Whether `user` is the sender or the recipient
    pub fn involves(&self, user: &UserId) -> bool {
        &self.sender_id == user || &self.recipient_id == user
    }

    /// Whether this message was exchanged between `a` and `b`, in either direction
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.recipient_id == b)
            || (&self.sender_id == b && &self.recipient_id == a)
    }

    /// The other party of this message, seen from `user`
    pub fn peer_of(&self, user: &UserId) -> &UserId {
        if &self.sender_id == user {
            &self.recipient_id
        } else {
            &self.sender_id
        }
    }
}

/// A validated message that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl NewMessage {
    /// Build a new message stamped with the current time
    pub fn now(sender_id: UserId, recipient_id: UserId, text: String) -> Self {
        Self {
            sender_id,
            recipient_id,
            text,
            sent_at: Utc::now(),
        }
    }
}

/// Inbox row: the latest message exchanged with one correspondent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPreview {
    /// The correspondent
    pub peer_id: UserId,
    /// Text of the most recent message
    pub last_message: String,
    /// Author of the most recent message (either the viewer or the peer)
    pub last_sender_id: UserId,
    /// Send time of the most recent message
    pub last_sent_at: DateTime<Utc>,
}

impl ConversationPreview {
    /// Preview row for `viewer` built from a single message
    pub fn from_message(viewer: &UserId, message: &Message) -> Self {
        Self {
            peer_id: message.peer_of(viewer).clone(),
            last_message: message.text.clone(),
            last_sender_id: message.sender_id.clone(),
            last_sent_at: message.sent_at,
        }
    }
}
