//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Slotbook
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! Capacity rejections and concurrency conflicts are expected, frequent
//! outcomes rather than exceptional conditions; their responses carry the
//! fields a caller needs to react (`available_seats`, `retryable`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotbook_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookingError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status
/// code and formats the error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::InsufficientCapacity { .. } => StatusCode::CONFLICT,
            BookingError::AlreadyTerminal(_) => StatusCode::CONFLICT,
            BookingError::ConcurrentConflict(_) => StatusCode::SERVICE_UNAVAILABLE,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON. Capacity and conflict
        // errors carry extra fields for the caller.
        let message = self.0.to_string();
        let body = match &self.0 {
            BookingError::InsufficientCapacity { available } => {
                Json(json!({ "error": message, "available_seats": available }))
            }
            BookingError::ConcurrentConflict(_) => {
                Json(json!({ "error": message, "retryable": true }))
            }
            _ => Json(json!({ "error": message })),
        };

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, BookingError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, eyre::Report>` in handler functions that return
/// `Result<T, AppError>`. It wraps the eyre error in a
/// `BookingError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
///
/// Provided for code that needs the response outside a handler's `?` chain.
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
