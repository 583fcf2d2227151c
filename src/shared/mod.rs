//! Shared Module
//!
//! This module contains the types exchanged between the server and its
//! clients: identities, messages, conversation previews and the JSON frames
//! of the real-time protocol. They carry no server state and can be reused by
//! client code that speaks the same protocol.

/// Identity, message and preview types
pub mod message;

/// Real-time wire protocol
pub mod event;

/// Re-export commonly used types for convenience
pub use message::{ConversationPreview, Message, NewMessage, UserId};
pub use event::{
    ClientEvent, ErrorKind, HistoryPage, HistoryRequest, SendMessageRequest, ServerEvent,
    SignalKind, SortOrder, TypingRequest,
};
