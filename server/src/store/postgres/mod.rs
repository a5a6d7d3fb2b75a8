//! Postgres store backend.
//!
//! Entities are persisted as JSONB documents alongside the columns needed
//! for lookups and constraints. Slot uniqueness and payment-audit uniqueness
//! live in the schema (partial/unique indexes), so concurrent writers race
//! on the index, not on application-level checks. Counter mutations are
//! single `jsonb_set` updates.

mod bookings;
mod catalog;
mod media;
mod messaging;
mod orders;
mod payments;
mod users;

pub use bookings::PostgresBookingStore;
pub use catalog::PostgresCatalogStore;
pub use media::PostgresMediaStore;
pub use messaging::{PostgresChatStore, PostgresNotificationStore};
pub use orders::PostgresOrderStore;
pub use payments::PostgresPaymentStore;
pub use users::PostgresUserStore;

use crate::error::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// True when the error is a unique-constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

/// Maps a storage failure to the domain taxonomy.
fn storage_err(context: &str) -> impl Fn(sqlx::Error) -> Error + '_ {
    move |e| Error::Upstream(format!("{context}: {e}"))
}

/// Serializes an entity into its JSONB document.
fn to_document<T: Serialize>(entity: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(entity)
        .map_err(|e| Error::Upstream(format!("failed to serialize document: {e}")))
}

/// Deserializes a JSONB document back into its entity.
fn from_document<T: DeserializeOwned>(json: serde_json::Value) -> Result<T, Error> {
    serde_json::from_value(json)
        .map_err(|e| Error::Upstream(format!("failed to deserialize document: {e}")))
}

/// Deserializes a column of JSONB rows.
fn from_rows<T: DeserializeOwned>(
    rows: Vec<(sqlx::types::JsonValue,)>,
) -> Result<Vec<T>, Error> {
    rows.into_iter().map(|(json,)| from_document(json)).collect()
}
