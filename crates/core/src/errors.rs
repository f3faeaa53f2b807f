use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Insufficient capacity: {available} seats available")]
    InsufficientCapacity { available: i32 },

    #[error("Concurrent conflict: {0}")]
    ConcurrentConflict(String),

    #[error("Booking is already terminal: {0}")]
    AlreadyTerminal(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Whether the caller should retry the operation after backing off.
    ///
    /// Only lock timeouts and deadlocks qualify; a capacity rejection is a
    /// final answer for the requested seat count.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::ConcurrentConflict(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
