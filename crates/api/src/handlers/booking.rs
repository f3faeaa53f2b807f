use axum::{extract::{Path, State}, Json};
use slotbook_core::{
    errors::BookingError,
    models::booking::{
        BookingResponse, BookingStatus, CreateBookingRequest, CreateBookingResponse,
        ReclaimResponse,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

use slotbook_db::models::DbBooking;

fn parse_status(db_booking: &DbBooking) -> Result<BookingStatus, AppError> {
    db_booking
        .booking_status()
        .map_err(|e| AppError(BookingError::Internal(e.into())))
}

fn to_response(db_booking: DbBooking) -> Result<BookingResponse, AppError> {
    let status = parse_status(&db_booking)?;

    Ok(BookingResponse {
        id: db_booking.id,
        slot_id: db_booking.slot_id,
        patient_name: db_booking.patient_name,
        patient_email: db_booking.patient_email,
        seats_booked: db_booking.seats_booked,
        status,
        created_at: db_booking.created_at,
        expires_at: db_booking.expires_at,
    })
}

/// Books seats against a slot. Validation, the capacity check, the
/// decrement, and the booking insert all happen inside the coordinator's
/// transaction; this handler only shapes the response.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let db_booking = state.coordinator.book(&payload).await?;
    let status = parse_status(&db_booking)?;

    Ok(Json(CreateBookingResponse {
        id: db_booking.id,
        slot_id: db_booking.slot_id,
        status,
        seats_booked: db_booking.seats_booked,
        expires_at: db_booking.expires_at,
    }))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let db_booking = slotbook_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;

    Ok(Json(to_response(db_booking)?))
}

#[axum::debug_handler]
pub async fn confirm_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let db_booking = state.coordinator.confirm(id).await?;

    Ok(Json(to_response(db_booking)?))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let db_booking = state.coordinator.cancel(id).await?;

    Ok(Json(to_response(db_booking)?))
}

#[axum::debug_handler]
pub async fn list_slot_bookings(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    slotbook_db::repositories::slot::get_slot_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {} not found", id)))?;

    let db_bookings =
        slotbook_db::repositories::booking::get_bookings_by_slot_id(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?;

    db_bookings
        .into_iter()
        .map(to_response)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

/// Operational trigger for the expiry sweep. The reclaimer binary calls the
/// same coordinator method on an interval.
#[axum::debug_handler]
pub async fn reclaim_expired(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ReclaimResponse>, AppError> {
    let reclaimed = state.coordinator.reclaim_expired().await?;

    Ok(Json(ReclaimResponse { reclaimed }))
}
