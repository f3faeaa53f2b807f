use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

/// Lifecycle state of a booking.
///
/// A booking starts as `Pending` and holds its seats until it is confirmed,
/// cancelled, or reclaimed by the expiry sweep. `Failed` and `Cancelled`
/// admit no further transitions; a `Confirmed` booking can still be
/// cancelled by an administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Failed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Failed => "failed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Failed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }

    /// States that hold no seats and admit no transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Failed | BookingStatus::Cancelled)
    }

    /// States whose seats count against the slot's availability.
    pub fn holds_seats(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "failed" => Ok(BookingStatus::Failed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub seats_booked: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub slot_id: Uuid,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub seats: i32,
}

impl CreateBookingRequest {
    /// Rejects malformed requests before any ledger access is attempted.
    pub fn validate(&self) -> BookingResult<()> {
        if self.seats < 1 {
            return Err(BookingError::InvalidRequest(
                "seats must be at least 1".to_string(),
            ));
        }

        if self.patient_name.trim().is_empty() {
            return Err(BookingError::InvalidRequest(
                "patient_name must not be empty".to_string(),
            ));
        }

        if let Some(email) = &self.patient_email {
            if !email.contains('@') {
                return Err(BookingError::InvalidRequest(
                    "patient_email is not a valid address".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub status: BookingStatus,
    pub seats_booked: i32,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub seats_booked: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclaimResponse {
    pub reclaimed: u64,
}
