//! Venue settings endpoints.
//!
//! A singleton record: the gym location copied onto gym-attendance
//! bookings at creation time.

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use crate::store::CatalogStore as _;
use crate::types::VenueSettings;
use axum::{Json, extract::State};
use fitsphere_web::AppError;

/// Fetch the venue settings.
pub async fn get_venue(
    State(state): State<AppState>,
) -> Result<Json<VenueSettings>, AppError> {
    let settings = state
        .stores()
        .catalog
        .venue_settings()
        .await?
        .ok_or_else(|| AppError::not_found("VenueSettings", "singleton"))?;
    Ok(Json(settings))
}

/// Replace the venue settings (admin).
pub async fn set_venue(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(settings): Json<VenueSettings>,
) -> Result<Json<VenueSettings>, AppError> {
    if !settings.location.is_valid() {
        return Err(AppError::bad_request(
            "Venue location must include an address and valid coordinates",
        ));
    }
    state.stores().catalog.set_venue_settings(&settings).await?;
    Ok(Json(settings))
}
