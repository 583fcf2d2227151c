/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Routes
 *
 * - `GET /ws` - WebSocket upgrade, behind the handshake middleware
 * - `GET /health` - Liveness probe with the online connection count
 *
 * Unknown paths fall through to a JSON 404.
 */

use crate::backend::chat::ChatService;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::ws_upgrade;
use crate::backend::server::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    // route_layer so the 401 only applies to matched realtime routes
    let realtime = Router::new()
        .route("/ws", get(ws_upgrade))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .merge(realtime)
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// GET /health
async fn health(State(chat): State<ChatService>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "online": chat.registry().len(),
    }))
}

async fn not_found() -> BackendError {
    BackendError::handler(StatusCode::NOT_FOUND, "Not found")
}
