//! Authentication endpoints.
//!
//! - `POST /api/auth/login` — admin login
//! - `POST /api/auth/user-login` — customer login
//! - `POST /api/auth/register` — customer registration
//! - `GET /api/auth/me` — current account

use crate::auth::{self, SessionUser};
use crate::server::state::AppState;
use crate::store::UserStore as _;
use crate::types::{NotificationKind, Role, UserAccount, UserId, UserProfile};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use fitsphere_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Display name
    pub name: String,
    /// Contact phone
    pub phone: Option<String>,
}

/// Login/registration response carrying the access token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token
    pub access_token: String,
    /// Always "bearer"
    pub token_type: &'static str,
    /// Account id
    pub user_id: Uuid,
    /// Account email
    pub email: String,
    /// Display name
    pub name: String,
    /// Account role
    pub role: Role,
}

async fn authenticate(
    state: &AppState,
    email: &str,
    password: &str,
    required_role: Role,
) -> Result<UserAccount, AppError> {
    let user = state
        .stores()
        .users
        .get_by_email(email)
        .await?
        .filter(|u| auth::verify_password(password, &u.password_hash))
        .ok_or_else(|| AppError::unauthorized("Incorrect email or password"))?;

    if user.role != required_role {
        return Err(AppError::unauthorized("Incorrect email or password"));
    }
    if !user.is_active {
        return Err(AppError::forbidden("Account is disabled"));
    }

    state.stores().users.touch_last_login(&user.id).await?;
    Ok(user)
}

fn login_response(state: &AppState, user: &UserAccount) -> Result<LoginResponse, AppError> {
    let token = state
        .tokens
        .issue(user)
        .map_err(|e| AppError::internal("Failed to issue token").with_source(e.into()))?;
    Ok(LoginResponse {
        access_token: token,
        token_type: "bearer",
        user_id: *user.id.as_uuid(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    })
}

/// Admin login.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = authenticate(&state, &credentials.email, &credentials.password, Role::Admin).await?;
    Ok(Json(login_response(&state, &user)?))
}

/// Customer login.
pub async fn user_login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = authenticate(&state, &credentials.email, &credentials.password, Role::User).await?;
    Ok(Json(login_response(&state, &user)?))
}

/// Customer registration.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AppError::bad_request("A valid email is required"));
    }
    if request.password.len() < 8 {
        return Err(AppError::bad_request(
            "Password must be at least 8 characters",
        ));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }

    let user = UserAccount {
        id: UserId::new(),
        email: request.email.trim().to_lowercase(),
        name: request.name.trim().to_string(),
        phone: request.phone,
        password_hash: auth::hash_password(&request.password)?,
        role: Role::User,
        is_active: true,
        created_at: Utc::now(),
        last_login: None,
    };
    state.stores().users.insert(&user).await?;

    state
        .engine
        .notify(
            NotificationKind::NewUser,
            format!("New user registered: {}", user.name),
        )
        .await;

    Ok((StatusCode::CREATED, Json(login_response(&state, &user)?)))
}

/// Current account details.
pub async fn me(
    session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .stores()
        .users
        .get(&session.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", session.user_id))?;
    Ok(Json(user.into()))
}
