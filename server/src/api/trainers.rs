//! Trainer catalog endpoints.

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use crate::store::{CatalogStore as _, ListFilter};
use crate::types::{Trainer, TrainerId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use fitsphere_web::AppError;
use serde::Deserialize;
use uuid::Uuid;

use super::MessageResponse;

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct TrainerQuery {
    /// Restrict to one specialization
    pub category: Option<String>,
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// New trainer body.
#[derive(Debug, Deserialize)]
pub struct TrainerCreate {
    /// Trainer name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Discipline
    pub specialization: String,
    /// Years of experience
    pub experience_years: u32,
    /// Short biography
    pub bio: String,
    /// Certification names
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Portrait URL
    pub photo_url: Option<String>,
}

/// Partial trainer update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct TrainerUpdate {
    /// New name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New phone
    pub phone: Option<String>,
    /// New specialization
    pub specialization: Option<String>,
    /// New experience
    pub experience_years: Option<u32>,
    /// New biography
    pub bio: Option<String>,
    /// New certifications
    pub certifications: Option<Vec<String>>,
    /// New portrait URL
    pub photo_url: Option<String>,
    /// Accept or stop accepting bookings
    pub is_active: Option<bool>,
}

/// Create a trainer (admin).
pub async fn create_trainer(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<TrainerCreate>,
) -> Result<(StatusCode, Json<Trainer>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Trainer name is required"));
    }
    let now = Utc::now();
    let trainer = Trainer {
        id: TrainerId::new(),
        name: body.name,
        email: body.email,
        phone: body.phone,
        specialization: body.specialization,
        experience_years: body.experience_years,
        bio: body.bio,
        certifications: body.certifications,
        total_sessions: 0,
        photo_url: body.photo_url,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.stores().catalog.insert_trainer(&trainer).await?;
    Ok((StatusCode::CREATED, Json(trainer)))
}

/// List trainers.
pub async fn list_trainers(
    State(state): State<AppState>,
    Query(query): Query<TrainerQuery>,
) -> Result<Json<Vec<Trainer>>, AppError> {
    let trainers = state
        .stores()
        .catalog
        .list_trainers(&ListFilter {
            category: query.category,
            search: query.search,
            skip: query.skip,
            limit: query.limit,
        })
        .await?;
    Ok(Json(trainers))
}

/// Fetch one trainer.
pub async fn get_trainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trainer>, AppError> {
    let id = TrainerId::from_uuid(id);
    let trainer = state
        .stores()
        .catalog
        .trainer(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Trainer", id))?;
    Ok(Json(trainer))
}

/// Update a trainer (admin).
pub async fn update_trainer(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<TrainerUpdate>,
) -> Result<Json<Trainer>, AppError> {
    let id = TrainerId::from_uuid(id);
    let mut trainer = state
        .stores()
        .catalog
        .trainer(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Trainer", id))?;

    if let Some(name) = update.name {
        trainer.name = name;
    }
    if let Some(email) = update.email {
        trainer.email = email;
    }
    if let Some(phone) = update.phone {
        trainer.phone = Some(phone);
    }
    if let Some(specialization) = update.specialization {
        trainer.specialization = specialization;
    }
    if let Some(experience_years) = update.experience_years {
        trainer.experience_years = experience_years;
    }
    if let Some(bio) = update.bio {
        trainer.bio = bio;
    }
    if let Some(certifications) = update.certifications {
        trainer.certifications = certifications;
    }
    if let Some(photo_url) = update.photo_url {
        trainer.photo_url = Some(photo_url);
    }
    if let Some(is_active) = update.is_active {
        trainer.is_active = is_active;
    }
    trainer.updated_at = Utc::now();

    state.stores().catalog.update_trainer(&trainer).await?;
    Ok(Json(trainer))
}

/// Delete a trainer (admin).
pub async fn delete_trainer(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = TrainerId::from_uuid(id);
    if !state.stores().catalog.delete_trainer(&id).await? {
        return Err(AppError::not_found("Trainer", id));
    }
    Ok(Json(MessageResponse::new("Trainer deleted successfully")))
}
