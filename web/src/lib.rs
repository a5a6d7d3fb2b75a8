//! Axum integration layer for the FitSphere backend.
//!
//! This crate holds the HTTP-facing plumbing that every handler shares:
//! the [`AppError`] response type and a small set of request extractors.
//! Domain logic never lives here; handlers in the server crate translate
//! domain errors into [`AppError`] and return it directly from Axum
//! handlers.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON, form fields, bearer token)
//! 3. **Call into** the booking/settlement engine or a store
//! 4. **Map result** to an HTTP response, errors via [`AppError`]

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{BearerToken, CorrelationId};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
