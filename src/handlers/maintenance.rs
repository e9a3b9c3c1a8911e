// src/handlers/maintenance.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{RequireRole, RoleSecretary},
        society::SocietyContext,
    },
    models::maintenance::RecordPaymentPayload,
};

// GET /api/maintenance/pending
//
// Resumo de saldo pendente do usuário na sociedade do cabeçalho. Pode vir do
// cache (obsolescência limitada pelo TTL de 1 semana).
pub async fn get_pending_maintenance(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    society: SocietyContext,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .maintenance_service
        .get_pending_maintenance(user.id, society.0)
        .await?;

    Ok(Json(summary))
}

// GET /api/maintenance/records
pub async fn get_my_records(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    society: SocietyContext,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state
        .maintenance_service
        .get_my_records(user.id, society.0)
        .await?;

    Ok(Json(records))
}

// POST /api/maintenance (secretário ou admin)
pub async fn record_payment(
    State(app_state): State<AppState>,
    society: SocietyContext,
    _secretary: RequireRole<RoleSecretary>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let payment = app_state
        .maintenance_service
        .record_payment(society.0, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}
