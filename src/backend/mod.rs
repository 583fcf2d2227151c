//! Backend Module
//!
//! All server-side code for XFChat: an Axum WebSocket server that delivers
//! direct messages between users, with presence tracking, persistent history
//! and typing indicators.
//!
//! # Architecture
//!
//! - **`server`** - Initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`presence`** - Identity → live connection registry
//! - **`chat`** - Delivery pipeline, previews, history, signaling, stores
//! - **`realtime`** - WebSocket sessions and the connection actor
//! - **`auth`** - Handshake credential verification
//! - **`middleware`** - Request processing middleware
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── presence/       - Presence registry
//! ├── chat/           - Chat service and message stores
//! ├── realtime/       - WebSocket transport
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Delivery Model
//!
//! A message is persisted before anything is pushed. If the recipient is
//! online at that moment it is also pushed to their connection; otherwise it
//! waits in the store and shows up in their previews on next connect.
//! Pushes are best-effort and never retried.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Presence registry
pub mod presence;

/// Chat-related backend functionality
pub mod chat;

/// WebSocket transport
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use chat::ChatService;
pub use error::{BackendError, ChatError};
pub use server::create_app;
