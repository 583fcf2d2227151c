/**
 * Database Operations for Direct Messages
 *
 * This module provides the PostgreSQL-backed message store. The schema lives
 * in `migrations/` and is applied at startup by `server::config::load_database`.
 *
 * `seq` is a BIGSERIAL insertion counter used to break `sent_at` ties so that
 * conversation order is total.
 */

use crate::backend::chat::store::{MessageStore, PageWindow, StoreError};
use crate::shared::{ConversationPreview, Message, NewMessage, SortOrder, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const HISTORY_ASC: &str = r#"
    SELECT id, sender_id, recipient_id, text, sent_at
    FROM messages
    WHERE (sender_id = $1 AND recipient_id = $2)
       OR (sender_id = $2 AND recipient_id = $1)
    ORDER BY sent_at ASC, seq ASC
    LIMIT $3 OFFSET $4
"#;

const HISTORY_DESC: &str = r#"
    SELECT id, sender_id, recipient_id, text, sent_at
    FROM messages
    WHERE (sender_id = $1 AND recipient_id = $2)
       OR (sender_id = $2 AND recipient_id = $1)
    ORDER BY sent_at DESC, seq DESC
    LIMIT $3 OFFSET $4
"#;

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    sender_id: String,
    recipient_id: String,
    text: String,
    sent_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            sender_id: row.sender_id.into(),
            recipient_id: row.recipient_id.into(),
            text: row.text,
            sent_at: row.sent_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PreviewRow {
    peer_id: String,
    last_message: String,
    last_sender_id: String,
    last_sent_at: DateTime<Utc>,
}

impl From<PreviewRow> for ConversationPreview {
    fn from(row: PreviewRow) -> Self {
        ConversationPreview {
            peer_id: row.peer_id.into(),
            last_message: row.last_message,
            last_sender_id: row.last_sender_id.into(),
            last_sent_at: row.last_sent_at,
        }
    }
}

/// PostgreSQL message store
#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    /// Insert a message
    ///
    /// # Returns
    /// The stored row, including the generated id
    async fn persist_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, sender_id, recipient_id, text, sent_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, sender_id, recipient_id, text, sent_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.sender_id.as_str())
        .bind(message.recipient_id.as_str())
        .bind(&message.text)
        .bind(message.sent_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Latest message per correspondent
    ///
    /// `DISTINCT ON (peer_id)` keeps the first row of each peer group, which
    /// the inner ordering makes the most recent one.
    async fn query_previews(&self, user: &UserId) -> Result<Vec<ConversationPreview>, StoreError> {
        let rows = sqlx::query_as::<_, PreviewRow>(
            r#"
            SELECT DISTINCT ON (peer_id)
                peer_id,
                text AS last_message,
                sender_id AS last_sender_id,
                sent_at AS last_sent_at
            FROM (
                SELECT
                    CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END AS peer_id,
                    text, sender_id, sent_at, seq
                FROM messages
                WHERE sender_id = $1 OR recipient_id = $1
            ) AS conversation
            ORDER BY peer_id, sent_at DESC, seq DESC
            "#,
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ConversationPreview::from).collect())
    }

    async fn query_history(
        &self,
        user: &UserId,
        peer: &UserId,
        window: PageWindow,
    ) -> Result<Vec<Message>, StoreError> {
        let sql = match window.order {
            SortOrder::Asc => HISTORY_ASC,
            SortOrder::Desc => HISTORY_DESC,
        };

        let rows = sqlx::query_as::<_, MessageRow>(sql)
            .bind(user.as_str())
            .bind(peer.as_str())
            .bind(i64::from(window.limit))
            .bind(i64::from(window.offset))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}
