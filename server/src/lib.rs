//! FitSphere fitness-platform backend.
//!
//! A REST API over a Postgres-backed document store: training-session
//! bookings with slot reservation, retail orders, payment settlement through
//! an external gateway, CDN-backed media, and a realtime chat/notification
//! relay.
//!
//! # Architecture
//!
//! The [`engine`] module owns the core workflow — reserve → intent → verify
//! → mutate-counters → notify — and reaches every collaborator (catalog
//! store, payment gateway, CDN, relay) through a trait object, so the whole
//! engine runs identically against Postgres or the in-memory test backend.
//!
//! ```text
//! HTTP (axum handlers, api/*)
//!    │
//!    ├── auth extractors (SessionUser / RequireAdmin)
//!    ▼
//! Engine (booking lifecycle, settlement)
//!    ├── Stores (bookings/orders/payments/catalog/...)
//!    ├── PaymentGateway + SignatureVerifier
//!    └── Relay (broadcast fan-out to WebSocket clients)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod auth;
pub mod cdn;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod gateway;
pub mod relay;
pub mod seed;
pub mod server;
pub mod slots;
pub mod store;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::{Error, Result};
