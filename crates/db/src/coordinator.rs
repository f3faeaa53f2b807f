//! Booking coordinator: the transactional core that keeps slot capacity
//! consistent under concurrent booking traffic.
//!
//! Every mutation of `slots.available_seats` goes through a method here,
//! inside a single transaction that first takes the slot's row lock
//! (`SELECT ... FOR UPDATE`). Concurrent attempts against the same slot
//! serialize on that lock; attempts against different slots never contend.
//! Transactions that touch both a slot and a booking always lock the slot
//! row first, so coordinator transactions cannot deadlock each other.

use chrono::{DateTime, Duration, Utc};
use slotbook_core::errors::{BookingError, BookingResult};
use slotbook_core::models::booking::{BookingStatus, CreateBookingRequest};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::DbBooking;
use crate::repositories::{booking, slot};

/// Hold window granted to a new booking before the sweep may reclaim it.
const DEFAULT_HOLD_SECONDS: i64 = 120;

/// Upper bound on waiting for a slot's row lock.
const DEFAULT_LOCK_TIMEOUT_MS: i64 = 5_000;

/// How many expired bookings a single sweep picks up.
const RECLAIM_BATCH_SIZE: i64 = 100;

/// Coordinates booking attempts against the capacity ledger.
///
/// Owns an injected connection pool; cloning is cheap and clones share the
/// same pool.
#[derive(Clone)]
pub struct BookingCoordinator {
    pool: PgPool,
    hold_seconds: i64,
    lock_timeout_ms: i64,
}

impl BookingCoordinator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hold_seconds: DEFAULT_HOLD_SECONDS,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Overrides the hold window applied to new bookings.
    pub fn with_hold_window(mut self, hold_seconds: i64) -> Self {
        self.hold_seconds = hold_seconds;
        self
    }

    /// Overrides the bound on row-lock waits.
    pub fn with_lock_timeout(mut self, lock_timeout_ms: i64) -> Self {
        self.lock_timeout_ms = lock_timeout_ms;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Attempts to book seats against a slot as one atomic unit.
    ///
    /// Either a pending booking is created and the slot's availability
    /// decremented together, or nothing changes. A lock timeout or deadlock
    /// surfaces as `ConcurrentConflict`; retrying is the caller's decision.
    pub async fn book(&self, request: &CreateBookingRequest) -> BookingResult<DbBooking> {
        request.validate()?;

        let mut tx = self.begin().await?;

        let slot_row = slot::lock_and_read(&mut tx, request.slot_id)
            .await
            .map_err(map_conflict)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Slot with ID {} not found", request.slot_id))
            })?;

        if slot_row.available_seats < request.seats {
            // Dropping the transaction rolls it back; the ledger is untouched.
            return Err(BookingError::InsufficientCapacity {
                available: slot_row.available_seats,
            });
        }

        slot::decrement(&mut tx, request.slot_id, request.seats)
            .await
            .map_err(map_conflict)?;

        let expires_at = Utc::now() + Duration::seconds(self.hold_seconds);
        let db_booking = booking::insert_booking(
            &mut tx,
            request.slot_id,
            &request.patient_name,
            request.patient_email.as_deref(),
            request.seats,
            expires_at,
        )
        .await
        .map_err(map_conflict)?;

        tx.commit().await.map_err(map_conflict)?;

        debug!(
            "Booked {} seats on slot {} as booking {}",
            request.seats, request.slot_id, db_booking.id
        );

        Ok(db_booking)
    }

    /// Confirms a pending booking, making its seat hold permanent.
    ///
    /// A pending booking past its expiry that the sweep has not reclaimed
    /// yet still confirms; the sweep's status gate keeps the two outcomes
    /// from overlapping.
    pub async fn confirm(&self, booking_id: Uuid) -> BookingResult<DbBooking> {
        let mut tx = self.begin().await?;

        let db_booking = booking::lock_booking(&mut tx, booking_id)
            .await
            .map_err(map_conflict)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Booking with ID {} not found", booking_id))
            })?;

        let status = parse_status(&db_booking.status)?;
        if status != BookingStatus::Pending {
            return Err(BookingError::AlreadyTerminal(format!(
                "Booking {} is {}",
                booking_id, db_booking.status
            )));
        }

        booking::set_status(&mut tx, booking_id, BookingStatus::Confirmed)
            .await
            .map_err(map_conflict)?;

        tx.commit().await.map_err(map_conflict)?;

        Ok(DbBooking {
            status: BookingStatus::Confirmed.as_str().to_string(),
            ..db_booking
        })
    }

    /// Cancels a pending or confirmed booking and releases its seats back
    /// to the slot in the same transaction.
    pub async fn cancel(&self, booking_id: Uuid) -> BookingResult<DbBooking> {
        // Resolve the owning slot before opening the transaction; the slot
        // row lock is always taken before the booking row lock.
        let existing = booking::get_booking_by_id(&self.pool, booking_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Booking with ID {} not found", booking_id))
            })?;

        let mut tx = self.begin().await?;

        slot::lock_and_read(&mut tx, existing.slot_id)
            .await
            .map_err(map_conflict)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Slot with ID {} not found", existing.slot_id))
            })?;

        let db_booking = booking::lock_booking(&mut tx, booking_id)
            .await
            .map_err(map_conflict)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Booking with ID {} not found", booking_id))
            })?;

        let status = parse_status(&db_booking.status)?;
        if !status.can_transition_to(BookingStatus::Cancelled) {
            return Err(BookingError::AlreadyTerminal(format!(
                "Booking {} is {}",
                booking_id, db_booking.status
            )));
        }

        booking::set_status(&mut tx, booking_id, BookingStatus::Cancelled)
            .await
            .map_err(map_conflict)?;

        slot::increment(&mut tx, existing.slot_id, db_booking.seats_booked)
            .await
            .map_err(map_conflict)?;

        tx.commit().await.map_err(map_conflict)?;

        Ok(DbBooking {
            status: BookingStatus::Cancelled.as_str().to_string(),
            ..db_booking
        })
    }

    /// Sweeps pending bookings whose hold window has passed, marking each
    /// failed and returning its seats to the slot. Returns how many
    /// bookings were reclaimed.
    ///
    /// Each booking is reclaimed in its own transaction, so one failure
    /// cannot wedge the rest of the sweep. Re-running is a no-op for
    /// bookings already reclaimed.
    pub async fn reclaim_expired(&self) -> BookingResult<u64> {
        let now = Utc::now();
        let expired = booking::find_expired_pending(&self.pool, now, RECLAIM_BATCH_SIZE)
            .await
            .map_err(BookingError::Database)?;

        let mut reclaimed = 0u64;
        for (booking_id, slot_id) in expired {
            match self.reclaim_one(booking_id, slot_id, now).await {
                Ok(true) => reclaimed += 1,
                // Confirmed, cancelled, or reclaimed by a concurrent sweep
                // between the scan and the lock.
                Ok(false) => {}
                Err(err) => {
                    warn!("Failed to reclaim booking {}: {}", booking_id, err);
                }
            }
        }

        Ok(reclaimed)
    }

    async fn reclaim_one(
        &self,
        booking_id: Uuid,
        slot_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<bool> {
        let mut tx = self.begin().await?;

        if slot::lock_and_read(&mut tx, slot_id)
            .await
            .map_err(map_conflict)?
            .is_none()
        {
            // Slot was cascade-deleted under us; nothing to release.
            return Ok(false);
        }

        let Some(seats) = booking::mark_expired_failed(&mut tx, booking_id, now)
            .await
            .map_err(map_conflict)?
        else {
            return Ok(false);
        };

        slot::increment(&mut tx, slot_id, seats)
            .await
            .map_err(map_conflict)?;

        tx.commit().await.map_err(map_conflict)?;

        Ok(true)
    }

    async fn begin(&self) -> BookingResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(map_conflict)?;

        // Bounds how long any statement in this transaction may wait on a
        // row lock. SET does not take bind parameters; the value is a
        // number of milliseconds.
        sqlx::query(&format!("SET LOCAL lock_timeout = {}", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await
            .map_err(map_conflict)?;

        Ok(tx)
    }
}

/// Lock timeouts and deadlocks are the retryable class; everything else is
/// a storage fault.
fn map_conflict(err: sqlx::Error) -> BookingError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            // 55P03 lock_not_available, 40P01 deadlock_detected,
            // 40001 serialization_failure
            if code == "55P03" || code == "40P01" || code == "40001" {
                return BookingError::ConcurrentConflict(db_err.message().to_string());
            }
        }
    }

    BookingError::Database(eyre::Report::new(err))
}

fn parse_status(raw: &str) -> BookingResult<BookingStatus> {
    raw.parse::<BookingStatus>()
        .map_err(|e| BookingError::Internal(e.into()))
}
