/**
 * Message Delivery Pipeline
 *
 * # Event Flow
 *
 * 1. Validate the text and recipient
 * 2. Persist through the store (authoritative; failure aborts the send)
 * 3. Look up the recipient in the presence registry
 * 4. If online, enqueue `receiveMessage` on the recipient's connection
 * 5. Return the persisted message
 *
 * Persisting always happens before routing, so a recipient never sees a
 * message that was not recorded. Routing failures are logged and swallowed:
 * the recipient can still fetch the message through `history`.
 */

use crate::backend::chat::service::ChatService;
use crate::backend::chat::store::StoreError;
use crate::backend::error::ChatError;
use crate::shared::{Message, NewMessage, ServerEvent, UserId};

impl ChatService {
    /// Send a direct message
    ///
    /// # Errors
    ///
    /// * `ChatError::Validation` - empty or oversized text, blank recipient
    /// * `ChatError::Persistence` - the store rejected the write
    ///
    /// Push failures never surface here.
    pub async fn send(
        &self,
        sender: &UserId,
        recipient: &UserId,
        text: &str,
    ) -> Result<Message, ChatError> {
        self.validate_outbound(recipient, text)?;

        let pending = NewMessage::now(sender.clone(), recipient.clone(), text.to_string());
        let store = self.store.clone();

        // Detached: the write completes even if the sending connection drops.
        let message = tokio::spawn(async move { store.persist_message(pending).await })
            .await
            .map_err(|e| StoreError::unavailable(format!("persist task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(sender = %sender, recipient = %recipient, "[Chat] Failed to persist message: {}", e);
                e
            })?;

        tracing::info!(
            message_id = %message.id,
            sender = %message.sender_id,
            recipient = %message.recipient_id,
            "[Chat] Message persisted"
        );

        self.route(&message);
        Ok(message)
    }

    /// Reject input that must never reach the store
    pub(crate) fn validate_outbound(&self, recipient: &UserId, text: &str) -> Result<(), ChatError> {
        if recipient.is_empty() {
            tracing::warn!("[Chat] Rejected message with empty recipient");
            return Err(ChatError::validation("recipientId", "Recipient cannot be empty"));
        }

        if text.trim().is_empty() {
            tracing::warn!(recipient = %recipient, "[Chat] Rejected message with empty text");
            return Err(ChatError::validation("text", "Message text cannot be empty"));
        }

        let length = text.chars().count();
        if length > self.limits.max_message_length {
            tracing::warn!(
                recipient = %recipient,
                "[Chat] Rejected message that is too long ({} chars)",
                length
            );
            return Err(ChatError::validation(
                "text",
                format!(
                    "Message text exceeds {} characters",
                    self.limits.max_message_length
                ),
            ));
        }

        Ok(())
    }

    /// Best-effort push of a persisted message to its recipient
    fn route(&self, message: &Message) {
        let Some(handle) = self.registry.lookup(&message.recipient_id) else {
            tracing::debug!(
                message_id = %message.id,
                recipient = %message.recipient_id,
                "[Chat] Recipient offline, message kept for history"
            );
            return;
        };

        if handle.is_closed() {
            tracing::debug!(
                message_id = %message.id,
                connection = %handle.id(),
                "[Chat] Recipient connection closing, message kept for history"
            );
            return;
        }

        match handle.push(ServerEvent::ReceiveMessage(message.clone())) {
            Ok(()) => tracing::debug!(
                message_id = %message.id,
                connection = %handle.id(),
                "[Chat] Message pushed to recipient"
            ),
            Err(e) => tracing::warn!(
                message_id = %message.id,
                connection = %handle.id(),
                "[Chat] Push to recipient failed ({}), message kept for history",
                e
            ),
        }
    }
}
