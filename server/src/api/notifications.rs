//! Admin notification endpoints.

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use crate::store::NotificationStore as _;
use crate::types::Notification;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use fitsphere_web::AppError;
use serde::Deserialize;
use uuid::Uuid;

use super::MessageResponse;

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    /// Only return unread notifications
    #[serde(default)]
    pub unread_only: bool,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// List notifications (admin).
pub async fn list_notifications(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let limit = if query.limit <= 0 { 20 } else { query.limit };
    let notifications = state
        .stores()
        .notifications
        .list(query.unread_only, query.skip, limit)
        .await?;
    Ok(Json(notifications))
}

/// Mark one notification read (admin).
pub async fn mark_read(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.stores().notifications.mark_read(&id).await? {
        return Err(AppError::not_found("Notification", id));
    }
    Ok(Json(MessageResponse::new("Notification marked as read")))
}
