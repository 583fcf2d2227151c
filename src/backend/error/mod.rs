//! Backend Error Module
//!
//! This module defines the errors raised by the chat core and the HTTP layer.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - ChatError and BackendError definitions
//! └── conversion.rs - IntoResponse and ServerEvent conversions
//! ```
//!
//! # Error Types
//!
//! - `ChatError` - Validation, handshake, persistence and authorization failures
//! - `BackendError` - Errors returned from HTTP handlers and middleware
//!
//! `BackendError` implements `IntoResponse`; `ChatError` converts into the
//! `error` frame sent over a live connection.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, ChatError};
