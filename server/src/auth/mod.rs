//! Identity & access: password hashing, token issue/validation, extractors.
//!
//! Access tokens are stateless HS256 JWTs carrying the subject id, email and
//! role; endpoints gate on role through the [`middleware`] extractors.

pub mod middleware;
pub mod token;

pub use middleware::{RequireAdmin, SessionUser};
pub use token::{Claims, TokenService};

use crate::error::{Error, Result};

/// Hashes a password with bcrypt at the default cost.
///
/// # Errors
///
/// Returns `Upstream` if hashing fails (effectively never for valid input).
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| Error::Upstream(format!("password hashing failed: {e}")))
}

/// Verifies a password against a stored bcrypt hash.
///
/// A malformed stored hash verifies as false rather than erroring, so a
/// corrupt row cannot be used to probe the hasher.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("Admin@123").expect("hashing succeeds");
        assert!(verify_password("Admin@123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
