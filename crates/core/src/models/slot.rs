use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_capacity: i32,
    pub available_seats: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_capacity: i32,
}

impl CreateSlotRequest {
    pub fn validate(&self) -> BookingResult<()> {
        if self.total_capacity < 1 {
            return Err(BookingError::InvalidRequest(
                "total_capacity must be at least 1".to_string(),
            ));
        }

        if self.end_time <= self.start_time {
            return Err(BookingError::InvalidRequest(
                "end_time must be after start_time".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_capacity: i32,
    pub available_seats: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub slot_id: Uuid,
    pub available_seats: i32,
}
