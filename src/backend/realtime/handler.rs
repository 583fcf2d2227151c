/**
 * WebSocket Upgrade Handler
 *
 * `GET /ws` sits behind `auth_middleware`, so by the time this handler runs
 * the handshake has already produced an identity.
 */

use crate::backend::middleware::AuthUser;
use crate::backend::realtime::connection::run_connection;
use crate::backend::server::state::AppState;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};

/// GET /ws
pub async fn ws_upgrade(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ws: WebSocketUpgrade,
) -> Response {
    let service = state.chat.clone();
    let outbound_buffer = state.config.outbound_buffer;

    tracing::info!(user_id = %user.user_id, "[Realtime] Upgrading connection");
    ws.on_upgrade(move |socket| run_connection(socket, service, user.user_id, outbound_buffer))
}
