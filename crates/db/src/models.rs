use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::models::booking::BookingStatus;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_capacity: i32,
    pub available_seats: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub seats_booked: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DbBooking {
    /// Parses the stored status column into the domain enum.
    ///
    /// The CHECK constraint on the table makes a parse failure a data bug,
    /// not a user error.
    pub fn booking_status(&self) -> Result<BookingStatus, String> {
        self.status.parse()
    }
}
