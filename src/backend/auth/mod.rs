//! Authentication Module
//!
//! The authentication handshake: turning the credential presented on a new
//! connection into an identity before the connection may reach the presence
//! registry.
//!
//! - **`sessions`** - JWT verification and issuance (`Authenticator`)
//!
//! The HTTP side of the handshake (credential extraction, 401 responses) is
//! in `backend::middleware::auth`.

/// Session token verification
pub mod sessions;

pub use sessions::{Authenticator, Claims};
