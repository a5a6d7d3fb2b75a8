//! Postgres catalog store: products, programs, trainers, venue settings.
//!
//! Counter mutations (`stock`, `enrolled_count`, `total_sessions`) are
//! single `jsonb_set` updates so concurrent settlements never lose an
//! increment to a read-modify-write interleaving.

use super::{from_document, storage_err, to_document};
use crate::error::{Error, Result};
use crate::store::{CatalogStore, ListFilter, effective_limit};
use crate::types::{Product, ProductId, Program, ProgramId, Trainer, TrainerId, VenueSettings};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Catalog reference data over the `products`/`programs`/`trainers`/
/// `venue_settings` tables.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn insert_document(
        &self,
        table: &str,
        id: &uuid::Uuid,
        data: &serde_json::Value,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        let query =
            format!("INSERT INTO {table} (id, data, created_at) VALUES ($1, $2, $3)");
        sqlx::query(&query)
            .bind(id)
            .bind(data)
            .bind(created_at)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| Error::Upstream(format!("failed to insert into {table}: {e}")))?;
        Ok(())
    }

    async fn get_document(
        &self,
        table: &str,
        id: &uuid::Uuid,
    ) -> Result<Option<sqlx::types::JsonValue>> {
        let query = format!("SELECT data FROM {table} WHERE id = $1");
        let row: Option<(sqlx::types::JsonValue,)> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| Error::Upstream(format!("failed to query {table}: {e}")))?;
        Ok(row.map(|(json,)| json))
    }

    async fn update_document(
        &self,
        table: &str,
        resource: &'static str,
        id: &uuid::Uuid,
        data: &serde_json::Value,
    ) -> Result<()> {
        let query = format!("UPDATE {table} SET data = $2 WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(data)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| Error::Upstream(format!("failed to update {table}: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(resource, id));
        }
        Ok(())
    }

    async fn delete_document(&self, table: &str, id: &uuid::Uuid) -> Result<bool> {
        let query = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| Error::Upstream(format!("failed to delete from {table}: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_documents(
        &self,
        table: &str,
        name_field: &str,
        category_field: &str,
        filter: &ListFilter,
    ) -> Result<Vec<sqlx::types::JsonValue>> {
        let query = format!(
            "SELECT data FROM {table}
             WHERE ($1::text IS NULL OR LOWER(data->>'{category_field}') = LOWER($1))
               AND ($2::text IS NULL OR data->>'{name_field}' ILIKE '%' || $2 || '%')
             ORDER BY created_at DESC
             OFFSET $3 LIMIT $4"
        );
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(&query)
            .bind(filter.category.as_deref())
            .bind(filter.search.as_deref())
            .bind(filter.skip.max(0))
            .bind(effective_limit(filter.limit))
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(|e| Error::Upstream(format!("failed to list {table}: {e}")))?;
        Ok(rows.into_iter().map(|(json,)| json).collect())
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        self.insert_document(
            "products",
            product.id.as_uuid(),
            &to_document(product)?,
            product.created_at,
        )
        .await
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>> {
        self.get_document("products", id.as_uuid())
            .await?
            .map(from_document)
            .transpose()
    }

    async fn list_products(&self, filter: &ListFilter) -> Result<Vec<Product>> {
        let rows = self
            .list_documents("products", "name", "category", filter)
            .await?;
        rows.into_iter().map(from_document).collect()
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.update_document(
            "products",
            "Product",
            product.id.as_uuid(),
            &to_document(product)?,
        )
        .await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool> {
        self.delete_document("products", id.as_uuid()).await
    }

    async fn decrement_stock(&self, id: &ProductId, quantity: u32) -> Result<i64> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE products
             SET data = jsonb_set(data, '{stock}',
                                  to_jsonb((data->>'stock')::bigint - $2))
             WHERE id = $1
             RETURNING (data->>'stock')::bigint",
        )
        .bind(id.as_uuid())
        .bind(i64::from(quantity))
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to decrement stock"))?;

        row.map(|(stock,)| stock)
            .ok_or_else(|| Error::not_found("Product", *id))
    }

    async fn insert_program(&self, program: &Program) -> Result<()> {
        self.insert_document(
            "programs",
            program.id.as_uuid(),
            &to_document(program)?,
            program.created_at,
        )
        .await
    }

    async fn program(&self, id: &ProgramId) -> Result<Option<Program>> {
        self.get_document("programs", id.as_uuid())
            .await?
            .map(from_document)
            .transpose()
    }

    async fn list_programs(&self, filter: &ListFilter) -> Result<Vec<Program>> {
        let rows = self
            .list_documents("programs", "title", "category", filter)
            .await?;
        rows.into_iter().map(from_document).collect()
    }

    async fn update_program(&self, program: &Program) -> Result<()> {
        self.update_document(
            "programs",
            "Program",
            program.id.as_uuid(),
            &to_document(program)?,
        )
        .await
    }

    async fn delete_program(&self, id: &ProgramId) -> Result<bool> {
        self.delete_document("programs", id.as_uuid()).await
    }

    async fn increment_enrollment(&self, id: &ProgramId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE programs
             SET data = jsonb_set(data, '{enrolled_count}',
                                  to_jsonb((data->>'enrolled_count')::bigint + 1))
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to increment enrollment"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Program", *id));
        }
        Ok(())
    }

    async fn insert_trainer(&self, trainer: &Trainer) -> Result<()> {
        self.insert_document(
            "trainers",
            trainer.id.as_uuid(),
            &to_document(trainer)?,
            trainer.created_at,
        )
        .await
    }

    async fn trainer(&self, id: &TrainerId) -> Result<Option<Trainer>> {
        self.get_document("trainers", id.as_uuid())
            .await?
            .map(from_document)
            .transpose()
    }

    async fn list_trainers(&self, filter: &ListFilter) -> Result<Vec<Trainer>> {
        let rows = self
            .list_documents("trainers", "name", "specialization", filter)
            .await?;
        rows.into_iter().map(from_document).collect()
    }

    async fn update_trainer(&self, trainer: &Trainer) -> Result<()> {
        self.update_document(
            "trainers",
            "Trainer",
            trainer.id.as_uuid(),
            &to_document(trainer)?,
        )
        .await
    }

    async fn delete_trainer(&self, id: &TrainerId) -> Result<bool> {
        self.delete_document("trainers", id.as_uuid()).await
    }

    async fn increment_sessions(&self, id: &TrainerId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE trainers
             SET data = jsonb_set(data, '{total_sessions}',
                                  to_jsonb((data->>'total_sessions')::bigint + 1))
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to increment sessions"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Trainer", *id));
        }
        Ok(())
    }

    async fn venue_settings(&self) -> Result<Option<VenueSettings>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM venue_settings WHERE id = TRUE")
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query venue settings"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn set_venue_settings(&self, settings: &VenueSettings) -> Result<()> {
        sqlx::query(
            "INSERT INTO venue_settings (id, data) VALUES (TRUE, $1)
             ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data",
        )
        .bind(to_document(settings)?)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to store venue settings"))?;
        Ok(())
    }
}
