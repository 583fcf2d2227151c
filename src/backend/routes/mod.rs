//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Main router creation and route assembly
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xfchat::backend::chat::MemoryMessageStore;
//! use xfchat::backend::routes::create_router;
//! use xfchat::backend::server::{build_state, ServerConfig};
//!
//! let state = build_state(ServerConfig::default(), Arc::new(MemoryMessageStore::new()));
//! let router = create_router(state);
//! ```

/// Main router creation
pub mod router;

pub use router::create_router;
