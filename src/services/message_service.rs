use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::message::{CreateMessage, Message};

#[derive(Clone)]
pub struct MessageService {
    pool: PgPool,
}

impl MessageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Full thread between two users, oldest first. A thread is the
    /// unordered pair, so messages in both directions come back. Pure
    /// read: fetching never flips `is_read`; callers acknowledge
    /// explicitly via `acknowledge_read`.
    pub async fn list_thread(&self, self_id: Uuid, counterpart_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(self_id)
        .bind(counterpart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn send(&self, msg: CreateMessage) -> Result<Message> {
        if msg.content.trim().is_empty() {
            return Err(Error::BadRequest("Message content is empty".to_string()));
        }
        if msg.sender_id == msg.receiver_id {
            return Err(Error::BadRequest(
                "Cannot send a message to yourself".to_string(),
            ));
        }

        // No idempotency key: a double-submit inserts twice.
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (content, sender_id, sender_role, receiver_id, receiver_role, is_read)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING *
            "#,
        )
        .bind(msg.content.trim())
        .bind(msg.sender_id)
        .bind(&msg.sender_role)
        .bind(msg.receiver_id)
        .bind(&msg.receiver_role)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Marks the unread messages the counterpart sent to `self_id` as
    /// read. Messages addressed to the counterpart are untouched.
    pub async fn acknowledge_read(&self, self_id: Uuid, counterpart_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE receiver_id = $1 AND sender_id = $2 AND NOT is_read
            "#,
        )
        .bind(self_id)
        .bind(counterpart_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn unread_count(&self, self_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM messages
            WHERE receiver_id = $1 AND NOT is_read
            "#,
        )
        .bind(self_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
