use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbBooking, DbDoctor, DbSlot};

// Mock repositories for testing
mock! {
    pub DoctorRepo {
        pub async fn create_doctor(
            &self,
            name: &'static str,
            specialization: &'static str,
        ) -> eyre::Result<DbDoctor>;

        pub async fn get_doctor_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbDoctor>>;

        pub async fn list_doctors(&self) -> eyre::Result<Vec<DbDoctor>>;
    }
}

mock! {
    pub SlotRepo {
        pub async fn create_slot(
            &self,
            doctor_id: Uuid,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
            total_capacity: i32,
        ) -> eyre::Result<DbSlot>;

        pub async fn get_slot_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbSlot>>;

        pub async fn get_slots_by_doctor_id(
            &self,
            doctor_id: Uuid,
        ) -> eyre::Result<Vec<DbSlot>>;

        pub async fn get_slot_availability(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<i32>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn get_booking_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn get_bookings_by_slot_id(
            &self,
            slot_id: Uuid,
        ) -> eyre::Result<Vec<DbBooking>>;
    }
}
