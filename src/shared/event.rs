/**
 * Real-time Wire Protocol
 *
 * This module defines the JSON frames exchanged over a chat connection.
 * Every frame is an adjacently tagged object:
 *
 * ```json
 * {"event": "sendMessage", "data": {"recipientId": "u2", "text": "hi"}}
 * ```
 *
 * `ClientEvent` covers inbound frames, `ServerEvent` covers everything the
 * server pushes or replies with.
 */
use crate::shared::message::{ConversationPreview, Message, UserId};
use serde::{Deserialize, Serialize};

/// Page ordering for conversation history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

/// Kind of ephemeral signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// The sender is typing
    #[default]
    Typing,
    /// The sender stopped typing
    Stopped,
}

/// `sendMessage` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: UserId,
    pub text: String,
}

/// `getHistory` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    /// The other party of the conversation
    pub peer_id: UserId,
    /// Requested page size; clamped server-side
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of messages to skip
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    /// Identity the client claims to be reading as. Must match the
    /// authenticated identity when present.
    #[serde(default)]
    pub as_user: Option<UserId>,
}

impl HistoryRequest {
    /// First page of the conversation with `peer_id`, server defaults for the rest
    pub fn with_peer(peer_id: impl Into<UserId>) -> Self {
        Self {
            peer_id: peer_id.into(),
            limit: None,
            offset: None,
            order: None,
            as_user: None,
        }
    }
}

/// `typing` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingRequest {
    pub recipient_id: UserId,
    #[serde(default)]
    pub kind: SignalKind,
}

/// Frames sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    SendMessage(SendMessageRequest),
    GetHistory(HistoryRequest),
    Typing(TypingRequest),
}

/// One page of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub peer_id: UserId,
    pub messages: Vec<Message>,
    pub order: SortOrder,
    pub offset: u32,
    /// Whether another page exists after this one
    pub has_more: bool,
}

/// Category of a per-operation failure reported to a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Auth,
    Persistence,
    AuthorizationViolation,
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Inbox snapshot, sent right after admission
    PreviewList { previews: Vec<ConversationPreview> },
    /// Reply to `getHistory`
    ChatHistory(HistoryPage),
    /// A message pushed to its online recipient
    ReceiveMessage(Message),
    /// Acknowledgement to the sender with server-assigned id and timestamp
    MessageSent(Message),
    #[serde(rename_all = "camelCase")]
    IsTyping { sender_id: UserId, kind: SignalKind },
    Error { kind: ErrorKind, message: String },
    /// A newer connection for the same identity replaced this one
    Superseded,
}
