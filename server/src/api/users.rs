//! User directory endpoints (admin).

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use crate::store::{OrderStore as _, UserStore as _};
use crate::types::{Order, UserId, UserProfile};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use fitsphere_web::AppError;
use serde::Serialize;
use uuid::Uuid;

use super::Pagination;

/// A user with their purchase history.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    /// The account
    #[serde(flatten)]
    pub user: UserProfile,
    /// The account's orders, newest-first
    pub orders: Vec<Order>,
}

/// List accounts (admin).
pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = state.stores().users.list(page.skip, page.limit).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// Fetch one account with purchase history (admin).
pub async fn get_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDetail>, AppError> {
    let user_id = UserId::from_uuid(id);
    let user = state
        .stores()
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user_id))?;
    let orders = state.stores().orders.list_for_user(&user_id).await?;
    Ok(Json(UserDetail {
        user: user.into(),
        orders,
    }))
}
