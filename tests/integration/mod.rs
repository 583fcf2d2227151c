//! Integration tests
//!
//! Exercise the public API end to end against the in-memory store.

pub mod handshake_test;
pub mod session_test;
pub mod websocket_test;
