use axum::Json;
use chrono::Utc;
use mockall::predicate;
use slotbook_core::{
    errors::BookingError,
    models::slot::{AvailabilityResponse, CreateSlotRequest},
};
use slotbook_db::models::DbSlot;
use uuid::Uuid;

use crate::test_utils::TestContext;
use slotbook_api::middleware::error_handling::AppError;

fn sample_slot(id: Uuid, available_seats: i32) -> DbSlot {
    let created_at = Utc::now();
    DbSlot {
        id,
        doctor_id: Uuid::new_v4(),
        start_time: created_at,
        end_time: created_at + chrono::Duration::hours(1),
        total_capacity: 10,
        available_seats,
        created_at,
    }
}

// Availability is an unlocked snapshot read; the wrapper mirrors the
// handler's mapping of the repository result
async fn test_get_availability_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
) -> Result<Json<AvailabilityResponse>, AppError> {
    match ctx.slot_repo.get_slot_availability(id).await {
        Ok(Some(available_seats)) => Ok(Json(AvailabilityResponse {
            slot_id: id,
            available_seats,
        })),
        Ok(None) => Err(AppError(BookingError::NotFound(format!(
            "Slot with ID {} not found",
            id
        )))),
        Err(err) => Err(AppError(BookingError::Database(err))),
    }
}

#[tokio::test]
async fn test_get_slot_availability() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.slot_repo
        .expect_get_slot_availability()
        .with(predicate::eq(id))
        .returning(|_| Ok(Some(4)));

    let result = test_get_availability_wrapper(&mut ctx, id).await;

    let response = result.expect("expected availability").0;
    assert_eq!(response.slot_id, id);
    assert_eq!(response.available_seats, 4);
}

#[tokio::test]
async fn test_get_slot_availability_unknown_slot() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.slot_repo
        .expect_get_slot_availability()
        .returning(|_| Ok(None));

    let result = test_get_availability_wrapper(&mut ctx, id).await;

    assert!(matches!(
        result.err().map(|e| e.0),
        Some(BookingError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_doctor_slots() {
    let mut ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let slots = vec![
        sample_slot(Uuid::new_v4(), 10),
        sample_slot(Uuid::new_v4(), 0),
    ];

    ctx.slot_repo
        .expect_get_slots_by_doctor_id()
        .with(predicate::eq(doctor_id))
        .returning(move |_| Ok(slots.clone()));

    let result = ctx.slot_repo.get_slots_by_doctor_id(doctor_id).await;

    let listed = result.expect("expected slots");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].available_seats, 10);
    assert_eq!(listed[1].available_seats, 0);
}

#[test]
fn test_create_slot_request_validation() {
    let start = Utc::now();

    let zero_capacity = CreateSlotRequest {
        doctor_id: Uuid::new_v4(),
        start_time: start,
        end_time: start + chrono::Duration::hours(1),
        total_capacity: 0,
    };
    assert!(matches!(
        zero_capacity.validate(),
        Err(BookingError::InvalidRequest(_))
    ));

    let inverted_range = CreateSlotRequest {
        doctor_id: Uuid::new_v4(),
        start_time: start,
        end_time: start - chrono::Duration::minutes(30),
        total_capacity: 5,
    };
    assert!(matches!(
        inverted_range.validate(),
        Err(BookingError::InvalidRequest(_))
    ));
}
