//! Postgres notification and chat logs.

use super::{from_rows, storage_err, to_document};
use crate::error::Result;
use crate::store::{ChatStore, NotificationStore, effective_limit};
use crate::types::{ChatMessage, Notification, UserId};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Notification log over the `notifications` table.
#[derive(Clone)]
pub struct PostgresNotificationStore {
    pool: Arc<PgPool>,
}

impl PostgresNotificationStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn insert(&self, notification: &Notification) -> Result<()> {
        sqlx::query(
            "INSERT INTO notifications (id, is_read, data, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(notification.id)
        .bind(notification.is_read)
        .bind(to_document(notification)?)
        .bind(notification.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to insert notification"))?;
        Ok(())
    }

    async fn list(&self, unread_only: bool, skip: i64, limit: i64) -> Result<Vec<Notification>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM notifications
             WHERE (NOT $1 OR NOT is_read)
             ORDER BY created_at DESC
             OFFSET $2 LIMIT $3",
        )
        .bind(unread_only)
        .bind(skip.max(0))
        .bind(effective_limit(limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list notifications"))?;
        from_rows(rows)
    }

    async fn mark_read(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notifications
             SET is_read = TRUE,
                 data = jsonb_set(data, '{is_read}', 'true'::jsonb)
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to mark notification read"))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Chat log over the `chat_messages` table.
#[derive(Clone)]
pub struct PostgresChatStore {
    pool: Arc<PgPool>,
}

impl PostgresChatStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for PostgresChatStore {
    async fn insert(&self, message: &ChatMessage) -> Result<()> {
        sqlx::query(
            "INSERT INTO chat_messages (id, sender_id, receiver_id, data, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(message.id)
        .bind(message.sender_id.as_uuid())
        .bind(message.receiver_id.as_ref().map(UserId::as_uuid))
        .bind(to_document(message)?)
        .bind(message.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to insert chat message"))?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessage>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM chat_messages
             WHERE sender_id = $1 OR receiver_id = $1
             ORDER BY created_at ASC
             OFFSET $2 LIMIT $3",
        )
        .bind(user_id.as_uuid())
        .bind(skip.max(0))
        .bind(effective_limit(limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list chat messages"))?;
        from_rows(rows)
    }

    async fn list_all(
        &self,
        participant: Option<&UserId>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessage>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM chat_messages
             WHERE ($1::uuid IS NULL OR sender_id = $1 OR receiver_id = $1)
             ORDER BY created_at ASC
             OFFSET $2 LIMIT $3",
        )
        .bind(participant.map(UserId::as_uuid))
        .bind(skip.max(0))
        .bind(effective_limit(limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list chat messages"))?;
        from_rows(rows)
    }

    async fn mark_read(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE chat_messages
             SET data = jsonb_set(data, '{is_read}', 'true'::jsonb)
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to mark chat message read"))?;
        Ok(result.rows_affected() > 0)
    }
}
