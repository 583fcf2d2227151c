//! Presence Module
//!
//! Tracks which identities currently have a live connection and where to
//! route pushes for them.
//!
//! - **`registry`** - `PresenceRegistry`, `ConnectionHandle` and `ConnectionId`
//!
//! Registry state is purely in-memory and starts empty on every process
//! start; offline delivery relies on the durable store, never on presence.

/// Identity → connection registry
pub mod registry;

pub use registry::{ConnectionHandle, ConnectionId, PresenceRegistry, PushError};
