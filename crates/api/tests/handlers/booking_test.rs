use axum::Json;
use chrono::Utc;
use mockall::predicate;
use slotbook_core::{
    errors::BookingError,
    models::booking::{BookingResponse, BookingStatus},
};
use slotbook_db::models::{DbBooking, DbSlot};
use uuid::Uuid;

use crate::test_utils::TestContext;
use slotbook_api::middleware::error_handling::AppError;

fn sample_booking(id: Uuid, slot_id: Uuid, status: &str) -> DbBooking {
    let created_at = Utc::now();
    DbBooking {
        id,
        slot_id,
        patient_name: "Jordan Doe".to_string(),
        patient_email: Some("jordan@example.com".to_string()),
        seats_booked: 2,
        status: status.to_string(),
        created_at,
        expires_at: created_at + chrono::Duration::minutes(2),
    }
}

fn sample_slot(id: Uuid) -> DbSlot {
    let created_at = Utc::now();
    DbSlot {
        id,
        doctor_id: Uuid::new_v4(),
        start_time: created_at,
        end_time: created_at + chrono::Duration::hours(1),
        total_capacity: 5,
        available_seats: 3,
        created_at,
    }
}

fn to_booking_response(db_booking: DbBooking) -> Result<BookingResponse, AppError> {
    let status = db_booking
        .booking_status()
        .map_err(|e| AppError(BookingError::Internal(e.into())))?;

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

// Test wrappers that replace the real DB calls with mocks, mirroring the
// read-side handler logic
async fn test_get_booking_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
) -> Result<Json<BookingResponse>, AppError> {
    match ctx.booking_repo.get_booking_by_id(id).await {
        Ok(Some(db_booking)) => Ok(Json(to_booking_response(db_booking)?)),
        Ok(None) => Err(AppError(BookingError::NotFound(format!(
            "Booking with ID {} not found",
            id
        )))),
        Err(err) => Err(AppError(BookingError::Database(err))),
    }
}

async fn test_list_slot_bookings_wrapper(
    ctx: &mut TestContext,
    slot_id: Uuid,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let slot = ctx.slot_repo.get_slot_by_id(slot_id).await;
    match slot {
        Ok(Some(_)) => {
            let db_bookings = ctx
                .booking_repo
                .get_bookings_by_slot_id(slot_id)
                .await
                .map_err(BookingError::Database)?;

            db_bookings
                .into_iter()
                .map(to_booking_response)
                .collect::<Result<Vec<_>, _>>()
                .map(Json)
        }
        Ok(None) => Err(AppError(BookingError::NotFound(format!(
            "Slot with ID {} not found",
            slot_id
        )))),
        Err(err) => Err(AppError(BookingError::Database(err))),
    }
}

#[tokio::test]
async fn test_get_booking_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let db_booking = sample_booking(id, slot_id, "pending");

    ctx.booking_repo
        .expect_get_booking_by_id()
        .with(predicate::eq(id))
        .returning(move |_| Ok(Some(db_booking.clone())));

    let result = test_get_booking_wrapper(&mut ctx, id).await;

    let response = result.expect("expected a booking").0;
    assert_eq!(response.id, id);
    assert_eq!(response.slot_id, slot_id);
    assert_eq!(response.status, BookingStatus::Pending);
    assert_eq!(response.seats_booked, 2);
}

#[tokio::test]
async fn test_get_booking_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.booking_repo
        .expect_get_booking_by_id()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let result = test_get_booking_wrapper(&mut ctx, id).await;

    assert!(matches!(
        result.err().map(|e| e.0),
        Some(BookingError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_get_booking_database_error() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(|_| Err(eyre::eyre!("Database error")));

    let result = test_get_booking_wrapper(&mut ctx, id).await;

    assert!(matches!(
        result.err().map(|e| e.0),
        Some(BookingError::Database(_))
    ));
}

#[tokio::test]
async fn test_list_slot_bookings() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    let bookings = vec![
        sample_booking(Uuid::new_v4(), slot_id, "confirmed"),
        sample_booking(Uuid::new_v4(), slot_id, "failed"),
    ];

    ctx.slot_repo
        .expect_get_slot_by_id()
        .with(predicate::eq(slot_id))
        .returning(move |id| Ok(Some(sample_slot(id))));

    ctx.booking_repo
        .expect_get_bookings_by_slot_id()
        .with(predicate::eq(slot_id))
        .returning(move |_| Ok(bookings.clone()));

    let result = test_list_slot_bookings_wrapper(&mut ctx, slot_id).await;

    let response = result.expect("expected bookings").0;
    assert_eq!(response.len(), 2);
    assert_eq!(response[0].status, BookingStatus::Confirmed);
    assert_eq!(response[1].status, BookingStatus::Failed);
}

#[tokio::test]
async fn test_list_slot_bookings_unknown_slot() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    ctx.slot_repo
        .expect_get_slot_by_id()
        .returning(|_| Ok(None));

    let result = test_list_slot_bookings_wrapper(&mut ctx, slot_id).await;

    assert!(matches!(
        result.err().map(|e| e.0),
        Some(BookingError::NotFound(_))
    ));
}
