// src/handlers/society.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::{RequireRole, RoleAdmin}, society::SocietyContext},
    models::society::{AddMemberPayload, CreateSocietyPayload, UpdateRatePayload},
};

// POST /api/societies
pub async fn create_society(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateSocietyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let society = app_state
        .society_service
        .create_society(user.id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(society)))
}

// GET /api/societies/mine
pub async fn list_my_societies(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let societies = app_state.society_service.list_my_societies(user.id).await?;

    Ok(Json(societies))
}

// POST /api/societies/members (somente admin)
pub async fn add_member(
    State(app_state): State<AppState>,
    society: SocietyContext,
    _admin: RequireRole<RoleAdmin>,
    Json(payload): Json<AddMemberPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let member = app_state
        .society_service
        .add_member(society.0, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

// GET /api/societies/rate-history
pub async fn get_rate_history(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    society: SocietyContext,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state
        .society_service
        .get_rate_history(society.0)
        .await?;

    Ok(Json(history))
}

// PUT /api/societies/rate (somente admin)
pub async fn update_rate(
    State(app_state): State<AppState>,
    society: SocietyContext,
    _admin: RequireRole<RoleAdmin>,
    Json(payload): Json<UpdateRatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let society = app_state
        .society_service
        .update_rate(society.0, payload)
        .await?;

    Ok(Json(society))
}
