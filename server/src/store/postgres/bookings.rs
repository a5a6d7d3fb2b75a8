//! Postgres booking ledger.

use super::{from_document, from_rows, is_unique_violation, storage_err, to_document};
use crate::error::{Error, Result};
use crate::slots::SlotLabel;
use crate::store::{BookingFilter, BookingStore, effective_limit};
use crate::types::{Booking, BookingId, TrainerId, UserId};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

/// Booking ledger over the `bookings` table.
///
/// The partial unique index `bookings_live_slot_key` turns a double-booking
/// race into a unique violation surfaced here as `Conflict`.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: Arc<PgPool>,
}

impl PostgresBookingStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn slot_conflict(booking: &Booking) -> Error {
        Error::Conflict(format!(
            "Slot {} on {} is already booked",
            booking.time_slot, booking.booking_date
        ))
    }
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        let data = to_document(booking)?;
        sqlx::query(
            "INSERT INTO bookings
                 (id, user_id, trainer_id, booking_date, time_slot, status,
                  gateway_order_id, data, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.user_id.as_uuid())
        .bind(booking.trainer_id.as_uuid())
        .bind(booking.booking_date)
        .bind(booking.time_slot.as_str())
        .bind(booking.status.to_string())
        .bind(booking.gateway_order_id.as_deref())
        .bind(&data)
        .bind(booking.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::slot_conflict(booking)
            } else {
                Error::Upstream(format!("failed to insert booking: {e}"))
            }
        })?;
        Ok(())
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM bookings WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query booking"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<Booking>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM bookings WHERE gateway_order_id = $1")
                .bind(gateway_order_id)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(storage_err("failed to query booking by gateway order"))?;
        row.map(|(json,)| from_document(json)).transpose()
    }

    async fn live_slots(&self, trainer_id: &TrainerId, date: NaiveDate) -> Result<Vec<SlotLabel>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT time_slot FROM bookings
             WHERE trainer_id = $1 AND booking_date = $2
               AND status IN ('pending', 'confirmed')",
        )
        .bind(trainer_id.as_uuid())
        .bind(date)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to query live slots"))?;

        // Stored labels always come from the universe; skip any that do not
        // parse rather than failing the whole availability query.
        Ok(rows
            .into_iter()
            .filter_map(|(label,)| SlotLabel::parse(&label).ok())
            .collect())
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM bookings
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR data->>'payment_status' = $2)
             ORDER BY created_at DESC
             OFFSET $3 LIMIT $4",
        )
        .bind(filter.status.map(|s| s.to_string()))
        .bind(filter.payment_status.map(|s| s.to_string()))
        .bind(filter.skip.max(0))
        .bind(effective_limit(filter.limit))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list bookings"))?;
        from_rows(rows)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_err("failed to list user bookings"))?;
        from_rows(rows)
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        let data = to_document(booking)?;
        let result = sqlx::query(
            "UPDATE bookings
             SET booking_date = $2, time_slot = $3, status = $4,
                 gateway_order_id = $5, data = $6
             WHERE id = $1",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.booking_date)
        .bind(booking.time_slot.as_str())
        .bind(booking.status.to_string())
        .bind(booking.gateway_order_id.as_deref())
        .bind(&data)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::slot_conflict(booking)
            } else {
                Error::Upstream(format!("failed to update booking: {e}"))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Booking", booking.id));
        }
        Ok(())
    }
}
