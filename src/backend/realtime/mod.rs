//! Real-time Connection Module
//!
//! Bidirectional WebSocket transport for the chat service.
//!
//! # Architecture
//!
//! - **`session`** - Admission, event dispatch and disconnect, independent
//!   of the socket
//! - **`connection`** - Reader/writer actor around one `WebSocket`
//! - **`handler`** - The `GET /ws` upgrade handler
//!
//! # Frames
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": {...}}`. Clients send `sendMessage`,
//! `getHistory` and `typing`; the server sends `previewList`, `chatHistory`,
//! `receiveMessage`, `messageSent`, `isTyping`, `error` and `superseded`.

/// Transport-independent session
pub mod session;

/// WebSocket actor
pub mod connection;

/// Upgrade handler
pub mod handler;

pub use connection::{run_connection, CLOSE_SUPERSEDED};
pub use handler::ws_upgrade;
pub use session::Session;
