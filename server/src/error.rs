//! Domain error taxonomy for the booking/settlement core.
//!
//! Every fallible engine and store operation returns [`Error`]; handlers
//! convert it into an HTTP [`AppError`] via the `From` impl so status
//! mapping lives in exactly one place.

use fitsphere_web::AppError;
use thiserror::Error;

/// Result alias for domain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Domain failure taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing input, unsupported attendance mode, malformed location
    #[error("{0}")]
    Validation(String),

    /// Referenced booking/order/program/trainer/user does not exist
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Resource kind, e.g. "Booking"
        resource: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// Caller does not own the resource or lacks the required role
    #[error("{0}")]
    Forbidden(String),

    /// Slot already taken by a live booking
    #[error("{0}")]
    Conflict(String),

    /// Payment signature did not match the recomputed HMAC
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// Payment for this record has already been verified; side effects must
    /// not repeat. Handlers report this as an idempotent success.
    #[error("Payment already processed for this order")]
    AlreadyProcessed,

    /// A gateway, CDN or storage call failed or timed out
    #[error("Upstream call failed: {0}")]
    Upstream(String),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(msg) => Self::bad_request(msg),
            Error::NotFound { resource, id } => Self::not_found(resource, id),
            Error::Forbidden(msg) => Self::forbidden(msg),
            Error::Conflict(msg) => Self::conflict(msg),
            Error::InvalidSignature => Self::invalid_signature("Invalid payment signature"),
            // AlreadyProcessed is an idempotent success at the API layer;
            // handlers that can reach it must intercept before converting.
            Error::AlreadyProcessed => {
                Self::conflict("Payment already processed for this order")
            }
            Error::Upstream(msg) => Self::bad_gateway(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = Error::not_found("Booking", "abc");
        assert_eq!(err.to_string(), "Booking with id abc not found");
    }

    #[test]
    fn invalid_signature_maps_to_400() {
        let app: AppError = Error::InvalidSignature.into();
        assert_eq!(app.to_string(), "[INVALID_SIGNATURE] Invalid payment signature");
    }

    #[test]
    fn conflict_maps_to_conflict_code() {
        let app: AppError = Error::Conflict("Slot already booked".to_string()).into();
        assert_eq!(app.to_string(), "[CONFLICT] Slot already booked");
    }
}
