//! Postgres account directory.

use super::{from_document, from_rows, is_unique_violation, storage_err, to_document};
use crate::error::{Error, Result};
use crate::store::{UserStore, effective_limit};
use crate::types::{UserAccount, UserId};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Account directory over the `users` table.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: Arc<PgPool>,
}

impl PostgresUserStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: &UserAccount) -> Result<()> {
        let data = to_document(user)?;
        sqlx::query(
            "INSERT INTO users (id, email, role, data, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(user.role.to_string())
        .bind(&data)
        .bind(user.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict(format!("An account with email {} already exists", user.email))
            } else {
                Error::Upstream(format!("failed to insert user: {e}"))
            }
        })?;
        Ok(())
    }

    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM users WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query user"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query user by email"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<UserAccount>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM users ORDER BY created_at DESC OFFSET $1 LIMIT $2",
        )
        .bind(skip.max(0))
        .bind(effective_limit(limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list users"))?;
        from_rows(rows)
    }

    async fn touch_last_login(&self, id: &UserId) -> Result<()> {
        sqlx::query(
            "UPDATE users
             SET data = jsonb_set(data, '{last_login}', to_jsonb(NOW()))
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to stamp last login"))?;
        Ok(())
    }

    async fn count_admins(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(storage_err("failed to count admins"))?;
        Ok(count.unsigned_abs())
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(storage_err("failed to count users"))?;
        Ok(count.unsigned_abs())
    }
}
