//! Program catalog endpoints.
//!
//! Programs declare which attendance modes they support and the home-visit
//! surcharge the booking engine adds at reservation time.

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use crate::store::{CatalogStore as _, ListFilter};
use crate::types::{Difficulty, Money, Program, ProgramId, TrainerId};
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
pub struct ProgramQuery {
    /// Restrict to one category
    pub category: Option<String>,
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// New program body.
#[derive(Debug, Deserialize)]
pub struct ProgramCreate {
    /// Program title
    pub title: String,
    /// Marketing description
    pub description: String,
    /// Category label
    pub category: String,
    /// Program length
    pub duration_weeks: u32,
    /// Price per booking in rupees
    pub price: Money,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Trainer running the program
    pub trainer_id: TrainerId,
    /// Sessions per week
    pub sessions_per_week: u32,
    /// Whether gym attendance is offered
    #[serde(default = "default_true")]
    pub supports_gym_attendance: bool,
    /// Whether home visits are offered
    #[serde(default)]
    pub supports_home_visit: bool,
    /// Surcharge for home visits in rupees
    #[serde(default)]
    pub home_visit_additional_charge: Option<Money>,
}

const fn default_true() -> bool {
    true
}

/// Partial program update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProgramUpdate {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New length
    pub duration_weeks: Option<u32>,
    /// New price
    pub price: Option<Money>,
    /// New difficulty
    pub difficulty: Option<Difficulty>,
    /// New trainer
    pub trainer_id: Option<TrainerId>,
    /// New weekly cadence
    pub sessions_per_week: Option<u32>,
    /// Offer or withdraw gym attendance
    pub supports_gym_attendance: Option<bool>,
    /// Offer or withdraw home visits
    pub supports_home_visit: Option<bool>,
    /// New home-visit surcharge
    pub home_visit_additional_charge: Option<Money>,
}

/// Create a program (admin).
pub async fn create_program(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ProgramCreate>,
) -> Result<(StatusCode, Json<Program>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::bad_request("Program title is required"));
    }
    if !body.supports_gym_attendance && !body.supports_home_visit {
        return Err(AppError::bad_request(
            "Program must support at least one attendance mode",
        ));
    }
    if state
        .stores()
        .catalog
        .trainer(&body.trainer_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Trainer", body.trainer_id));
    }

    let now = Utc::now();
    let program = Program {
        id: ProgramId::new(),
        title: body.title,
        description: body.description,
        category: body.category,
        duration_weeks: body.duration_weeks,
        price: body.price,
        difficulty: body.difficulty,
        trainer_id: body.trainer_id,
        sessions_per_week: body.sessions_per_week,
        enrolled_count: 0,
        supports_gym_attendance: body.supports_gym_attendance,
        supports_home_visit: body.supports_home_visit,
        home_visit_surcharge: body.home_visit_additional_charge.unwrap_or(Money::ZERO),
        created_at: now,
        updated_at: now,
    };
    state.stores().catalog.insert_program(&program).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

/// List programs.
pub async fn list_programs(
    State(state): State<AppState>,
    Query(query): Query<ProgramQuery>,
) -> Result<Json<Vec<Program>>, AppError> {
    let programs = state
        .stores()
        .catalog
        .list_programs(&ListFilter {
            category: query.category,
            search: query.search,
            skip: query.skip,
            limit: query.limit,
        })
        .await?;
    Ok(Json(programs))
}

/// Fetch one program.
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Program>, AppError> {
    let id = ProgramId::from_uuid(id);
    let program = state
        .stores()
        .catalog
        .program(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Program", id))?;
    Ok(Json(program))
}

/// Update a program (admin).
pub async fn update_program(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ProgramUpdate>,
) -> Result<Json<Program>, AppError> {
    let id = ProgramId::from_uuid(id);
    let mut program = state
        .stores()
        .catalog
        .program(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Program", id))?;

    if let Some(title) = update.title {
        program.title = title;
    }
    if let Some(description) = update.description {
        program.description = description;
    }
    if let Some(category) = update.category {
        program.category = category;
    }
    if let Some(duration_weeks) = update.duration_weeks {
        program.duration_weeks = duration_weeks;
    }
    if let Some(price) = update.price {
        program.price = price;
    }
    if let Some(difficulty) = update.difficulty {
        program.difficulty = difficulty;
    }
    if let Some(trainer_id) = update.trainer_id {
        if state.stores().catalog.trainer(&trainer_id).await?.is_none() {
            return Err(AppError::not_found("Trainer", trainer_id));
        }
        program.trainer_id = trainer_id;
    }
    if let Some(sessions_per_week) = update.sessions_per_week {
        program.sessions_per_week = sessions_per_week;
    }
    if let Some(gym) = update.supports_gym_attendance {
        program.supports_gym_attendance = gym;
    }
    if let Some(home) = update.supports_home_visit {
        program.supports_home_visit = home;
    }
    if let Some(surcharge) = update.home_visit_additional_charge {
        program.home_visit_surcharge = surcharge;
    }
    if !program.supports_gym_attendance && !program.supports_home_visit {
        return Err(AppError::bad_request(
            "Program must support at least one attendance mode",
        ));
    }
    program.updated_at = Utc::now();

    state.stores().catalog.update_program(&program).await?;
    Ok(Json(program))
}

/// Delete a program (admin).
pub async fn delete_program(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = ProgramId::from_uuid(id);
    if !state.stores().catalog.delete_program(&id).await? {
        return Err(AppError::not_found("Program", id));
    }
    Ok(Json(MessageResponse::new("Program deleted successfully")))
}
