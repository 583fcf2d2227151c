//! Chat Backend Module
//!
//! This module contains the message delivery core:
//! - Message delivery pipeline (validate, persist, push)
//! - Conversation previews and paginated history
//! - Typing signals
//! - The durable store contract and its PostgreSQL / in-memory implementations
//!
//! # Architecture
//!
//! - **`service`** - `ChatService` and its limits
//! - **`pipeline`** - `ChatService::send`
//! - **`aggregation`** - `ChatService::previews` and `ChatService::history`
//! - **`signaling`** - `ChatService::signal`
//! - **`store`** - `MessageStore` trait and `MemoryMessageStore`
//! - **`db`** - `PgMessageStore`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xfchat::backend::chat::{ChatLimits, ChatService, MemoryMessageStore};
//! use xfchat::backend::presence::PresenceRegistry;
//!
//! # async fn example() {
//! let service = ChatService::new(
//!     Arc::new(PresenceRegistry::new()),
//!     Arc::new(MemoryMessageStore::new()),
//!     ChatLimits::default(),
//! );
//! let message = service.send(&"u1".into(), &"u2".into(), "hi").await;
//! # }
//! ```

/// Chat service and limits
pub mod service;

/// Message delivery pipeline
pub mod pipeline;

/// Previews and history
pub mod aggregation;

/// Typing indicators
pub mod signaling;

/// Store contract and in-memory store
pub mod store;

/// PostgreSQL store
pub mod db;

/// Re-export commonly used types
pub use service::{ChatLimits, ChatService};
pub use store::{MemoryMessageStore, MessageStore, PageWindow, StoreError};
pub use db::PgMessageStore;
