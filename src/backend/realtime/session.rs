/**
 * Connection Session
 *
 * The transport-independent half of a live connection: everything that
 * happens between admission and disconnect, minus the socket.
 *
 * # Lifecycle
 *
 * 1. `open` holds the new handle, admits the identity into the presence
 *    registry, tells any displaced connection it was superseded, then
 *    releases the handle with the inbox previews as its first frame
 * 2. `handle_frame` / `handle_event` dispatch client events to `ChatService`
 *    and reply on this connection's own queue
 * 3. `close` removes the registry entry if it still belongs to this session
 *
 * Per-operation failures are reported as `error` frames; they never end the
 * session.
 */

use crate::backend::chat::ChatService;
use crate::backend::error::ChatError;
use crate::backend::presence::{ConnectionHandle, ConnectionId};
use crate::shared::{ClientEvent, ServerEvent, UserId};

pub struct Session {
    user: UserId,
    handle: ConnectionHandle,
    service: ChatService,
}

impl Session {
    /// Admit `user` at `handle` and deliver the opening preview list
    ///
    /// The handle is held from before admission until the preview list is
    /// enqueued, so `previewList` is always the first frame. Anything routed
    /// to the connection in between follows it, in order.
    pub async fn open(service: ChatService, user: UserId, handle: ConnectionHandle) -> Self {
        handle.hold();

        if let Some(displaced) = service.registry().admit(user.clone(), handle.clone()) {
            if let Err(e) = displaced.push(ServerEvent::Superseded) {
                tracing::debug!(
                    user_id = %user,
                    connection = %displaced.id(),
                    "[Realtime] Could not notify superseded connection: {}",
                    e
                );
            }
        }

        let opening = match service.previews(&user).await {
            Ok(previews) => ServerEvent::PreviewList { previews },
            Err(e) => {
                tracing::error!(user_id = %user, "[Realtime] Failed to load previews: {}", e);
                ServerEvent::from(e)
            }
        };

        if let Err(e) = handle.release_with(opening) {
            tracing::debug!(user_id = %user, "[Realtime] Opening frame dropped: {}", e);
        }

        Self {
            user,
            handle,
            service,
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.handle.id()
    }

    /// Parse and dispatch one text frame
    pub async fn handle_frame(&self, raw: &str) {
        match serde_json::from_str::<ClientEvent>(raw) {
            Ok(event) => self.handle_event(event).await,
            Err(e) => {
                tracing::debug!(user_id = %self.user, "[Realtime] Malformed frame: {}", e);
                let err = ChatError::validation("frame", format!("Malformed frame: {}", e));
                self.reply(ServerEvent::from(err));
            }
        }
    }

    pub async fn handle_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::SendMessage(request) => {
                match self
                    .service
                    .send(&self.user, &request.recipient_id, &request.text)
                    .await
                {
                    Ok(message) => self.reply(ServerEvent::MessageSent(message)),
                    Err(e) => self.reply(ServerEvent::from(e)),
                }
            }
            ClientEvent::GetHistory(request) => {
                match self.service.history(&self.user, &request).await {
                    Ok(page) => self.reply(ServerEvent::ChatHistory(page)),
                    Err(e) => self.reply(ServerEvent::from(e)),
                }
            }
            ClientEvent::Typing(request) => {
                self.service
                    .signal(&self.user, &request.recipient_id, request.kind);
            }
        }
    }

    /// Withdraw this session from the registry
    ///
    /// Returns false when a newer connection already owns the identity.
    pub fn close(&self) -> bool {
        let removed = self.service.registry().remove(&self.user, self.handle.id());
        tracing::info!(
            user_id = %self.user,
            connection = %self.handle.id(),
            removed,
            "[Realtime] Session closed"
        );
        removed
    }

    fn reply(&self, event: ServerEvent) {
        if let Err(e) = self.handle.push(event) {
            tracing::debug!(user_id = %self.user, "[Realtime] Reply dropped: {}", e);
        }
    }
}
