//! Authentication extractors.
//!
//! - [`SessionUser`]: any authenticated account
//! - [`RequireAdmin`]: administrator accounts only
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn my_bookings(
//!     session: SessionUser,
//!     State(state): State<AppState>,
//! ) -> Result<Json<Vec<Booking>>, AppError> {
//!     // session.user_id is guaranteed valid
//! }
//!
//! async fn export_csv(admin: RequireAdmin, ...) -> ... {
//!     // admin.0.user_id is guaranteed to be an administrator
//! }
//! ```

use crate::auth::token::TokenService;
use crate::engine::Caller;
use crate::types::{Role, UserId};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use fitsphere_web::{AppError, BearerToken};

/// Authenticated principal extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The authenticated user id
    pub user_id: UserId,
    /// Login email from the token
    pub email: String,
    /// Role from the token
    pub role: Role,
}

impl SessionUser {
    /// The engine-facing caller identity.
    #[must_use]
    pub const fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;
        let tokens = TokenService::from_ref(state);
        let claims = tokens
            .validate(&bearer.0)
            .map_err(|_| AppError::unauthorized("Could not validate credentials"))?;
        Ok(Self {
            user_id: claims.user_id(),
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Extractor that admits administrators only.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionUser::from_request_parts(parts, state).await?;
        if session.role != Role::Admin {
            return Err(AppError::forbidden("Administrator access required"));
        }
        Ok(Self(session))
    }
}
