//! XFChat - Main Library
//!
//! XFChat is a presence-aware direct messaging server built on Axum.
//!
//! # Overview
//!
//! - Authenticated WebSocket connections, one live session per user
//! - Durable message history in PostgreSQL (or memory, for development)
//! - Real-time push to online recipients, deferred delivery via previews
//!   for offline ones
//! - Inbox previews and paginated conversation history
//! - Ephemeral typing indicators
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types: messages, previews, client/server events
//! - **`backend`** - Axum server, presence registry, chat service, stores
//!
//! # Usage
//!
//! ```rust,no_run
//! use xfchat::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()?).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
