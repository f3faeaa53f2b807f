use axum::{extract::{Path, State}, Json};
use slotbook_core::{
    errors::BookingError,
    models::slot::{AvailabilityResponse, CreateSlotRequest, SlotResponse},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

use slotbook_db::models::DbSlot;

fn to_response(db_slot: DbSlot) -> SlotResponse {
    SlotResponse {
        id: db_slot.id,
        doctor_id: db_slot.doctor_id,
        start_time: db_slot.start_time,
        end_time: db_slot.end_time,
        total_capacity: db_slot.total_capacity,
        available_seats: db_slot.available_seats,
    }
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    payload.validate()?;

    // The owning doctor must exist before a slot can reference it
    slotbook_db::repositories::doctor::get_doctor_by_id(&state.db_pool, payload.doctor_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| {
            BookingError::NotFound(format!("Doctor with ID {} not found", payload.doctor_id))
        })?;

    // Create slot in database with every seat available
    let db_slot = slotbook_db::repositories::slot::create_slot(
        &state.db_pool,
        payload.doctor_id,
        payload.start_time,
        payload.end_time,
        payload.total_capacity,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(to_response(db_slot)))
}

#[axum::debug_handler]
pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SlotResponse>, AppError> {
    let db_slot = slotbook_db::repositories::slot::get_slot_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {} not found", id)))?;

    Ok(Json(to_response(db_slot)))
}

/// Unlocked snapshot read; the number returned may already be stale by the
/// time a booking attempt runs. The booking transaction is what resolves
/// that race.
#[axum::debug_handler]
pub async fn get_slot_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let available_seats =
        slotbook_db::repositories::slot::get_slot_availability(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {} not found", id)))?;

    Ok(Json(AvailabilityResponse {
        slot_id: id,
        available_seats,
    }))
}

#[axum::debug_handler]
pub async fn list_doctor_slots(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    slotbook_db::repositories::doctor::get_doctor_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Doctor with ID {} not found", id)))?;

    let db_slots = slotbook_db::repositories::slot::get_slots_by_doctor_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(db_slots.into_iter().map(to_response).collect()))
}
