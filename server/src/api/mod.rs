//! HTTP API handlers, one module per resource.

pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod chat;
pub mod images;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod programs;
pub mod settings;
pub mod trainers;
pub mod users;
pub mod videos;

use serde::Deserialize;

/// Common skip/limit pagination query.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// Generic message body for acknowledgement responses.
#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    /// Human-readable acknowledgement
    pub message: String,
}

impl MessageResponse {
    /// Creates an acknowledgement.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
