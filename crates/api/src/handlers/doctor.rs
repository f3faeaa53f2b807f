use axum::{extract::{Path, State}, Json};
use slotbook_core::{
    errors::BookingError,
    models::doctor::{CreateDoctorRequest, DoctorResponse},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

use slotbook_db::models::DbDoctor;

fn to_response(db_doctor: DbDoctor) -> DoctorResponse {
    DoctorResponse {
        id: db_doctor.id,
        name: db_doctor.name,
        specialization: db_doctor.specialization,
        created_at: db_doctor.created_at,
    }
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateDoctorRequest>,
) -> Result<Json<DoctorResponse>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(BookingError::InvalidRequest(
            "name must not be empty".to_string(),
        )));
    }

    // Create doctor in database
    let db_doctor = slotbook_db::repositories::doctor::create_doctor(
        &state.db_pool,
        &payload.name,
        &payload.specialization,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(to_response(db_doctor)))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DoctorResponse>, AppError> {
    let db_doctor = slotbook_db::repositories::doctor::get_doctor_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Doctor with ID {} not found", id)))?;

    Ok(Json(to_response(db_doctor)))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<DoctorResponse>>, AppError> {
    let db_doctors = slotbook_db::repositories::doctor::list_doctors(&state.db_pool)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(db_doctors.into_iter().map(to_response).collect()))
}
