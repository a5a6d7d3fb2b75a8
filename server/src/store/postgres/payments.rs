//! Postgres payment audit log.

use super::{from_document, from_rows, is_unique_violation, storage_err, to_document};
use crate::error::{Error, Result};
use crate::store::PaymentStore;
use crate::types::PaymentRecord;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Append-only audit log over the `payments` table.
///
/// The unique index on `gateway_order_id` makes a replayed verification a
/// constraint violation, surfaced as `AlreadyProcessed`. Rows are never
/// updated or deleted.
#[derive(Clone)]
pub struct PostgresPaymentStore {
    pool: Arc<PgPool>,
}

impl PostgresPaymentStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PostgresPaymentStore {
    async fn insert(&self, payment: &PaymentRecord) -> Result<()> {
        let data = to_document(payment)?;
        sqlx::query(
            "INSERT INTO payments (id, gateway_order_id, data, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(payment.id.as_uuid())
        .bind(&payment.gateway_order_id)
        .bind(&data)
        .bind(payment.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyProcessed
            } else {
                Error::Upstream(format!("failed to insert payment record: {e}"))
            }
        })?;
        Ok(())
    }

    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<PaymentRecord>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM payments WHERE gateway_order_id = $1")
                .bind(gateway_order_id)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query payment record"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn list(&self) -> Result<Vec<PaymentRecord>> {
        let rows: Vec<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM payments ORDER BY created_at DESC")
                .fetch_all(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to list payment records"))?;
        from_rows(rows)
    }
}
