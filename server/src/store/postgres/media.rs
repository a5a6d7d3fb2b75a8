//! Postgres media metadata store.

use super::{from_document, from_rows, storage_err, to_document};
use crate::error::{Error, Result};
use crate::store::{ListFilter, MediaStore, effective_limit};
use crate::types::{Image, ImageKind, Video};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Video and image metadata over the `videos`/`images` tables.
#[derive(Clone)]
pub struct PostgresMediaStore {
    pool: Arc<PgPool>,
}

impl PostgresMediaStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for PostgresMediaStore {
    async fn insert_video(&self, video: &Video) -> Result<()> {
        sqlx::query("INSERT INTO videos (id, data, created_at) VALUES ($1, $2, $3)")
            .bind(video.id)
            .bind(to_document(video)?)
            .bind(video.created_at)
            .execute(self.pool.as_ref())
            .await
            .map_err(storage_err("failed to insert video"))?;
        Ok(())
    }

    async fn video(&self, id: &Uuid) -> Result<Option<Video>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM videos WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query video"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn list_videos(
        &self,
        filter: &ListFilter,
        difficulty: Option<&str>,
    ) -> Result<Vec<Video>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM videos
             WHERE ($1::text IS NULL OR data->>'category' = $1)
               AND ($2::text IS NULL OR data->>'difficulty' = $2)
               AND ($3::text IS NULL OR data->>'title' ILIKE '%' || $3 || '%')
             ORDER BY created_at DESC
             OFFSET $4 LIMIT $5",
        )
        .bind(filter.category.as_deref())
        .bind(difficulty)
        .bind(filter.search.as_deref())
        .bind(filter.skip.max(0))
        .bind(effective_limit(filter.limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list videos"))?;
        from_rows(rows)
    }

    async fn update_video(&self, video: &Video) -> Result<()> {
        let result = sqlx::query("UPDATE videos SET data = $2 WHERE id = $1")
            .bind(video.id)
            .bind(to_document(video)?)
            .execute(self.pool.as_ref())
            .await
            .map_err(storage_err("failed to update video"))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("Video", video.id));
        }
        Ok(())
    }

    async fn delete_video(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(storage_err("failed to delete video"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_image(&self, image: &Image) -> Result<()> {
        let kind = serde_json::to_value(image.image_type)
            .ok()
            .and_then(|j| j.as_str().map(ToString::to_string))
            .unwrap_or_default();
        sqlx::query("INSERT INTO images (id, image_type, data, created_at) VALUES ($1, $2, $3, $4)")
            .bind(image.id)
            .bind(kind)
            .bind(to_document(image)?)
            .bind(image.created_at)
            .execute(self.pool.as_ref())
            .await
            .map_err(storage_err("failed to insert image"))?;
        Ok(())
    }

    async fn image(&self, id: &Uuid) -> Result<Option<Image>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM images WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query image"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn list_images(
        &self,
        kind: Option<ImageKind>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Image>> {
        let kind = kind.and_then(|k| {
            serde_json::to_value(k)
                .ok()
                .and_then(|j| j.as_str().map(ToString::to_string))
        });
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM images
             WHERE ($1::text IS NULL OR image_type = $1)
             ORDER BY created_at DESC
             OFFSET $2 LIMIT $3",
        )
        .bind(kind)
        .bind(skip.max(0))
        .bind(effective_limit(limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list images"))?;
        from_rows(rows)
    }

    async fn delete_image(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(storage_err("failed to delete image"))?;
        Ok(result.rows_affected() > 0)
    }
}
