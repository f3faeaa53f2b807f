use slotbook_api::middleware::error_handling::map_error;
use slotbook_core::errors::BookingError;

#[tokio::test]
async fn test_error_handling_invalid_request() {
    let error = BookingError::InvalidRequest("seats must be at least 1".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_not_found() {
    let error = BookingError::NotFound("Slot not found".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_insufficient_capacity() {
    let error = BookingError::InsufficientCapacity { available: 1 };

    let response = map_error(error);

    // A capacity rejection is a business outcome, not a server fault
    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_insufficient_capacity_body_reports_availability() {
    let error = BookingError::InsufficientCapacity { available: 3 };

    let response = map_error(error);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("Body is not JSON");

    assert_eq!(body["available_seats"], 3);
    assert!(body["error"].as_str().unwrap().contains("Insufficient"));
}

#[tokio::test]
async fn test_error_handling_concurrent_conflict() {
    let error = BookingError::ConcurrentConflict("lock timeout".to_string());

    let response = map_error(error);

    assert_eq!(
        response.status(),
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_concurrent_conflict_body_is_marked_retryable() {
    let error = BookingError::ConcurrentConflict("deadlock detected".to_string());

    let response = map_error(error);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("Body is not JSON");

    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn test_error_handling_already_terminal() {
    let error = BookingError::AlreadyTerminal("Booking is cancelled".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_database() {
    let error = BookingError::Database(eyre::eyre!("Database error"));

    let response = map_error(error);

    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    let response = map_error(error);

    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}
