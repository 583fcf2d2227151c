/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container, holding:
 * - The chat service (presence registry + message store)
 * - The handshake authenticator
 * - The loaded server configuration
 *
 * Every field is cheap to clone; clones share the same registry and store.
 */

use crate::backend::auth::Authenticator;
use crate::backend::chat::ChatService;
use crate::backend::server::config::ServerConfig;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Delivery pipeline, previews, history and signaling
    pub chat: ChatService,

    /// Verifies handshake credentials
    pub auth: Arc<Authenticator>,

    pub config: Arc<ServerConfig>,
}

/// Allows handlers to extract `State<ChatService>` directly
impl FromRef<AppState> for ChatService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat.clone()
    }
}

impl FromRef<AppState> for Arc<Authenticator> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
