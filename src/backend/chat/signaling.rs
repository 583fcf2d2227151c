/**
 * Ephemeral Signaling
 *
 * Typing indicators are routed to the target only if it is online right now.
 * Nothing is persisted or retried: a late "is typing" has no value once the
 * moment has passed.
 */

use crate::backend::chat::service::ChatService;
use crate::shared::{ServerEvent, SignalKind, UserId};

impl ChatService {
    /// Forward a typing signal from `from` to `to`
    ///
    /// Returns whether the signal was enqueued. Offline targets and full
    /// queues drop the signal silently.
    pub fn signal(&self, from: &UserId, to: &UserId, kind: SignalKind) -> bool {
        let Some(handle) = self.registry.lookup(to) else {
            tracing::trace!(from = %from, to = %to, "[Chat] Typing target offline, signal dropped");
            return false;
        };

        let event = ServerEvent::IsTyping {
            sender_id: from.clone(),
            kind,
        };

        match handle.push(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(from = %from, to = %to, "[Chat] Typing signal dropped: {}", e);
                false
            }
        }
    }
}
