//! Health endpoints.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process is serving
    pub status: &'static str,
    /// Server time
    pub timestamp: chrono::DateTime<Utc>,
}

/// Liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}
