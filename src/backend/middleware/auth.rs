/**
 * Handshake Authentication Middleware
 *
 * Guards the realtime endpoint. The credential is taken from the
 * `Authorization: Bearer <token>` header or, since browsers cannot set
 * headers on a WebSocket upgrade, from a `token` query parameter.
 *
 * A verified identity is attached to the request extensions. Anything else
 * is rejected with 401 before the upgrade happens, so an unauthenticated
 * connection never reaches the presence registry.
 */

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use crate::backend::error::{BackendError, ChatError};
use crate::backend::server::state::AppState;
use crate::shared::UserId;
use std::collections::HashMap;

/// Identity established by the handshake
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Authentication middleware
///
/// Returns 401 Unauthorized if the credential is missing or invalid
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let credential = extract_credential(&request).ok_or_else(|| {
        tracing::warn!(path = %request.uri().path(), "[Auth] Missing credential");
        ChatError::auth("Missing credential")
    })?;

    let user_id = app_state.auth.authenticate(&credential).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "[Auth] Rejected handshake: {}", e);
        e
    })?;

    tracing::debug!(user_id = %user_id, "[Auth] Handshake authenticated");
    request.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}

/// Credential from the bearer header, falling back to `?token=`
fn extract_credential(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<HashMap<String, String>>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(mut params)| params.remove("token"))
    })
}

/// Axum extractor for the authenticated user
///
/// Only valid behind `auth_middleware`; elsewhere it rejects with 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                ChatError::auth("Not authenticated")
            })?;

        Ok(AuthUser(user))
    }
}
