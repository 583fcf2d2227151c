/**
 * Conversation Preview Aggregation
 *
 * Inbox previews and paginated conversation history.
 *
 * Previews are a snapshot: one row per correspondent, most recently active
 * conversation first, ties broken by peer id. They are recomputed on every
 * call and never cached.
 *
 * History is restricted to the authenticated caller and the requested peer.
 * The store is asked for that conversation only, and rows are filtered again
 * here so a misbehaving store cannot leak other conversations.
 */

use crate::backend::chat::service::ChatService;
use crate::backend::chat::store::PageWindow;
use crate::backend::error::ChatError;
use crate::shared::{ConversationPreview, HistoryPage, HistoryRequest, UserId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

impl ChatService {
    /// Inbox previews for `user`
    pub async fn previews(&self, user: &UserId) -> Result<Vec<ConversationPreview>, ChatError> {
        let rows = self.store.query_previews(user).await?;
        let previews = normalize_previews(rows);
        tracing::debug!(user_id = %user, "[Chat] Computed {} conversation previews", previews.len());
        Ok(previews)
    }

    /// One page of the conversation between `user` and `request.peer_id`
    ///
    /// # Errors
    ///
    /// * `ChatError::AuthorizationViolation` - `request.as_user` names someone
    ///   other than `user`
    /// * `ChatError::Validation` - blank peer id
    /// * `ChatError::Persistence` - the store query failed
    pub async fn history(
        &self,
        user: &UserId,
        request: &HistoryRequest,
    ) -> Result<HistoryPage, ChatError> {
        if let Some(claimed) = &request.as_user {
            if claimed != user {
                tracing::warn!(
                    user_id = %user,
                    claimed = %claimed,
                    "[Chat] History requested on behalf of another user"
                );
                return Err(ChatError::authorization(
                    "History can only be read by a party to the conversation",
                ));
            }
        }

        if request.peer_id.is_empty() {
            return Err(ChatError::validation("peerId", "Peer cannot be empty"));
        }

        let limit = request
            .limit
            .unwrap_or(self.limits.default_page_size)
            .min(self.limits.max_page_size)
            .max(1);
        let offset = request.offset.unwrap_or(0);
        let order = request.order.unwrap_or_default();

        // One extra row tells us whether another page exists.
        let window = PageWindow {
            limit: limit.saturating_add(1),
            offset,
            order,
        };

        let mut messages = self
            .store
            .query_history(user, &request.peer_id, window)
            .await?;

        let fetched = messages.len();
        messages.retain(|m| m.is_between(user, &request.peer_id));
        if messages.len() != fetched {
            tracing::warn!(
                user_id = %user,
                peer = %request.peer_id,
                "[Chat] Dropped {} history rows outside the conversation",
                fetched - messages.len()
            );
        }

        let has_more = messages.len() > limit as usize;
        messages.truncate(limit as usize);

        Ok(HistoryPage {
            peer_id: request.peer_id.clone(),
            messages,
            order,
            offset,
            has_more,
        })
    }
}

/// One row per peer, keeping the latest; sorted newest first, then by peer id
pub fn normalize_previews(rows: Vec<ConversationPreview>) -> Vec<ConversationPreview> {
    let mut latest: HashMap<UserId, ConversationPreview> = HashMap::new();
    for row in rows {
        match latest.entry(row.peer_id.clone()) {
            Entry::Occupied(mut current) => {
                if row.last_sent_at > current.get().last_sent_at {
                    current.insert(row);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }

    let mut previews: Vec<ConversationPreview> = latest.into_values().collect();
    previews.sort_by(|a, b| {
        b.last_sent_at
            .cmp(&a.last_sent_at)
            .then_with(|| a.peer_id.cmp(&b.peer_id))
    });
    previews
}
