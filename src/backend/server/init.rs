/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including store selection, state creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL if `DATABASE_URL` is configured
 * 2. Fall back to the in-memory store otherwise
 * 3. Build the presence registry, chat service and authenticator
 * 4. Create and configure the router
 */

use crate::backend::auth::Authenticator;
use crate::backend::chat::{ChatService, MemoryMessageStore, MessageStore, PgMessageStore};
use crate::backend::presence::PresenceRegistry;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use axum::Router;
use std::sync::Arc;

/// Create and configure the Axum application
///
/// A missing or unreachable database does not prevent startup: messages are
/// then kept in memory for the lifetime of the process.
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("[Server] Initializing chat server");

    let store: Arc<dyn MessageStore> = match config.database_url.as_deref() {
        Some(url) => match load_database(url).await {
            Some(pool) => {
                tracing::info!("[Server] Using PostgreSQL message store");
                Arc::new(PgMessageStore::new(pool))
            }
            None => Arc::new(MemoryMessageStore::new()),
        },
        None => {
            tracing::warn!("[Server] DATABASE_URL not set, messages will not survive a restart");
            Arc::new(MemoryMessageStore::new())
        }
    };

    create_router(build_state(config, store))
}

/// Assemble `AppState` around an already chosen store
pub fn build_state(config: ServerConfig, store: Arc<dyn MessageStore>) -> AppState {
    let registry = Arc::new(PresenceRegistry::new());
    let chat = ChatService::new(registry, store, config.limits());
    let auth = Arc::new(
        Authenticator::new(&config.jwt_secret).with_token_ttl(config.token_ttl_secs),
    );

    AppState {
        chat,
        auth,
        config: Arc::new(config),
    }
}
