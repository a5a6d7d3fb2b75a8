//! HS256 access tokens.

use crate::types::{Role, UserAccount, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Claims carried in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Login email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    /// Subject as a typed id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }
}

/// Issues and validates access tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    ttl_hours: i64,
}

impl TokenService {
    /// Creates a service from the configured secret and token lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            ttl_hours: i64::try_from(ttl_hours).unwrap_or(24),
        }
    }

    /// Issues a token for an account.
    ///
    /// # Errors
    ///
    /// Returns the underlying encoding error (effectively never for HS256).
    pub fn issue(&self, user: &UserAccount) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: *user.id.as_uuid(),
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + Duration::hours(self.ttl_hours)).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Validates a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns the decoding error for expired, tampered or malformed
    /// tokens.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account(role: Role) -> UserAccount {
        UserAccount {
            id: UserId::new(),
            email: "sarah@example.com".to_string(),
            name: "Sarah".to_string(),
            phone: None,
            password_hash: "x".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn token_round_trip() {
        let service = TokenService::new("test-secret", 24);
        let user = account(Role::User);
        let token = service.issue(&user).unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.user_id(), user.id);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.email, user.email);
    }

    #[test]
    fn wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a", 24);
        let verifier = TokenService::new("secret-b", 24);
        let token = issuer.issue(&account(Role::Admin)).unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        let service = TokenService::new("test-secret", 24);
        assert!(service.validate("not.a.token").is_err());
    }
}
