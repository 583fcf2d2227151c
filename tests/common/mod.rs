//! Common test utilities and helpers
//!
//! - Service and app fixtures backed by the in-memory store
//! - Token helpers for the WebSocket handshake

pub mod auth_helpers;
pub mod fixtures;

pub use auth_helpers::*;
pub use fixtures::*;
