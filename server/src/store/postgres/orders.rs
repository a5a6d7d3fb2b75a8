//! Postgres order ledger.

use super::{from_document, from_rows, storage_err, to_document};
use crate::error::{Error, Result};
use crate::store::{OrderFilter, OrderStore, effective_limit};
use crate::types::{Order, OrderId, UserId};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Order ledger over the `orders` table.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        let data = to_document(order)?;
        sqlx::query(
            "INSERT INTO orders
                 (id, user_id, order_status, payment_status, gateway_order_id, data, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.order_status.to_string())
        .bind(order.payment_status.to_string())
        .bind(order.gateway_order_id.as_deref())
        .bind(&data)
        .bind(order.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to insert order"))?;
        Ok(())
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM orders WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query order"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<Order>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM orders WHERE gateway_order_id = $1")
                .bind(gateway_order_id)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query order by gateway order"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM orders
             WHERE ($1::text IS NULL OR order_status = $1)
               AND ($2::text IS NULL OR payment_status = $2)
             ORDER BY created_at DESC
             OFFSET $3 LIMIT $4",
        )
        .bind(filter.status.map(|s| s.to_string()))
        .bind(filter.payment_status.map(|s| s.to_string()))
        .bind(filter.skip.max(0))
        .bind(effective_limit(filter.limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list orders"))?;
        from_rows(rows)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let rows: Vec<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
                .bind(user_id.as_uuid())
                .fetch_all(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to list user orders"))?;
        from_rows(rows)
    }

    async fn update(&self, order: &Order) -> Result<()> {
        let data = to_document(order)?;
        let result = sqlx::query(
            "UPDATE orders
             SET order_status = $2, payment_status = $3, gateway_order_id = $4, data = $5
             WHERE id = $1",
        )
        .bind(order.id.as_uuid())
        .bind(order.order_status.to_string())
        .bind(order.payment_status.to_string())
        .bind(order.gateway_order_id.as_deref())
        .bind(&data)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to update order"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Order", order.id));
        }
        Ok(())
    }
}
