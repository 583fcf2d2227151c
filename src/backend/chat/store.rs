/**
 * Durable Store Contract
 *
 * This module defines the collaborator the chat pipeline persists to and
 * queries from, plus an in-memory implementation.
 *
 * # Implementations
 *
 * - `PgMessageStore` (see `chat::db`) - PostgreSQL via sqlx
 * - `MemoryMessageStore` - process-local, used when no database is
 *   configured and in tests
 *
 * Stores assign message ids and own ordering within a conversation; the
 * pipeline assigns `sent_at` before calling `persist_message`.
 */

use crate::shared::{ConversationPreview, Message, NewMessage, SortOrder, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database driver error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store cannot serve requests right now
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Normalized page window passed to `query_history`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u32,
    pub order: SortOrder,
}

/// Create/query operations over messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably record a message and return it with its assigned id
    async fn persist_message(&self, message: NewMessage) -> Result<Message, StoreError>;

    /// Latest message per correspondent of `user`, in any order
    async fn query_previews(&self, user: &UserId) -> Result<Vec<ConversationPreview>, StoreError>;

    /// Messages exchanged between `user` and `peer`, ordered by `sent_at`
    /// according to `window.order` and sliced by `window`
    async fn query_history(
        &self,
        user: &UserId,
        peer: &UserId,
        window: PageWindow,
    ) -> Result<Vec<Message>, StoreError>;
}

/// Keep the most recent message per peer of `viewer`
///
/// Messages are compared by `sent_at`; for equal timestamps the later one in
/// iteration order wins.
pub fn latest_per_peer<'a>(
    viewer: &UserId,
    messages: impl IntoIterator<Item = &'a Message>,
) -> Vec<ConversationPreview> {
    let mut latest: HashMap<&UserId, &Message> = HashMap::new();
    for message in messages {
        if !message.involves(viewer) {
            continue;
        }
        let peer = message.peer_of(viewer);
        let newer = latest
            .get(peer)
            .map_or(true, |current| message.sent_at >= current.sent_at);
        if newer {
            latest.insert(peer, message);
        }
    }

    latest
        .into_values()
        .map(|message| ConversationPreview::from_message(viewer, message))
        .collect()
}

/// In-memory message store
///
/// Messages are kept in insertion order, which breaks `sent_at` ties.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: RwLock<Vec<Message>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn persist_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let stored = Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            text: message.text,
            sent_at: message.sent_at,
        };
        self.messages.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn query_previews(&self, user: &UserId) -> Result<Vec<ConversationPreview>, StoreError> {
        let messages = self.messages.read().await;
        Ok(latest_per_peer(user, messages.iter()))
    }

    async fn query_history(
        &self,
        user: &UserId,
        peer: &UserId,
        window: PageWindow,
    ) -> Result<Vec<Message>, StoreError> {
        let messages = self.messages.read().await;

        // Stable sort keeps insertion order for equal timestamps.
        let mut conversation: Vec<&Message> =
            messages.iter().filter(|m| m.is_between(user, peer)).collect();
        conversation.sort_by_key(|m| m.sent_at);
        if window.order == SortOrder::Desc {
            conversation.reverse();
        }

        Ok(conversation
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .cloned()
            .collect())
    }
}
