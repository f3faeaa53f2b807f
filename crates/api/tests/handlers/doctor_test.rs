use axum::Json;
use chrono::Utc;
use mockall::predicate;
use slotbook_core::{errors::BookingError, models::doctor::DoctorResponse};
use slotbook_db::models::DbDoctor;
use uuid::Uuid;

use crate::test_utils::TestContext;
use slotbook_api::middleware::error_handling::AppError;

fn sample_doctor(id: Uuid) -> DbDoctor {
    DbDoctor {
        id,
        name: "Dr. Example".to_string(),
        specialization: "Cardiology".to_string(),
        created_at: Utc::now(),
    }
}

async fn test_get_doctor_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
) -> Result<Json<DoctorResponse>, AppError> {
    match ctx.doctor_repo.get_doctor_by_id(id).await {
        Ok(Some(db_doctor)) => Ok(Json(DoctorResponse {
            id: db_doctor.id,
            name: db_doctor.name,
            specialization: db_doctor.specialization,
            created_at: db_doctor.created_at,
        })),
        Ok(None) => Err(AppError(BookingError::NotFound(format!(
            "Doctor with ID {} not found",
            id
        )))),
        Err(err) => Err(AppError(BookingError::Database(err))),
    }
}

#[tokio::test]
async fn test_get_doctor_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .with(predicate::eq(id))
        .returning(move |id| Ok(Some(sample_doctor(id))));

    let result = test_get_doctor_wrapper(&mut ctx, id).await;

    let response = result.expect("expected a doctor").0;
    assert_eq!(response.id, id);
    assert_eq!(response.name, "Dr. Example");
}

#[tokio::test]
async fn test_get_doctor_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .returning(|_| Ok(None));

    let result = test_get_doctor_wrapper(&mut ctx, id).await;

    assert!(matches!(
        result.err().map(|e| e.0),
        Some(BookingError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_doctors() {
    let mut ctx = TestContext::new();
    let doctors = vec![sample_doctor(Uuid::new_v4()), sample_doctor(Uuid::new_v4())];

    ctx.doctor_repo
        .expect_list_doctors()
        .returning(move || Ok(doctors.clone()));

    let result = ctx.doctor_repo.list_doctors().await;

    assert_eq!(result.expect("expected doctors").len(), 2);
}
