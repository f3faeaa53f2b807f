use crate::models::DbBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use slotbook_core::models::booking::BookingStatus;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, slot_id, patient_name, patient_email, seats_booked, status, created_at, expires_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings_by_slot_id(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, slot_id, patient_name, patient_email, seats_booked, status, created_at, expires_at
        FROM bookings
        WHERE slot_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(slot_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Snapshot scan for the expiry sweep: pending bookings whose hold window
/// has passed, oldest first. Returns `(booking_id, slot_id)` pairs.
pub async fn find_expired_pending(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<(Uuid, Uuid)>> {
    let expired = sqlx::query_as::<_, (Uuid, Uuid)>(
        r#"
        SELECT id, slot_id
        FROM bookings
        WHERE status = 'pending' AND expires_at <= $1
        ORDER BY expires_at ASC
        LIMIT $2
        "#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(expired)
}

// Transaction-scoped operations used by the booking coordinator.

/// Inserts a new pending booking inside the caller's transaction. Must only
/// run after the slot's seats were checked and decremented under the same
/// row lock.
pub async fn insert_booking(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: Uuid,
    patient_name: &str,
    patient_email: Option<&str>,
    seats: i32,
    expires_at: DateTime<Utc>,
) -> Result<DbBooking, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, slot_id, patient_name, patient_email, seats_booked, status, created_at, expires_at)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7)
        RETURNING id, slot_id, patient_name, patient_email, seats_booked, status, created_at, expires_at
        "#,
    )
    .bind(id)
    .bind(slot_id)
    .bind(patient_name)
    .bind(patient_email)
    .bind(seats)
    .bind(now)
    .bind(expires_at)
    .fetch_one(&mut **tx)
    .await
}

/// Acquires the row lock for a booking and returns the current row.
pub async fn lock_booking(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<DbBooking>, sqlx::Error> {
    sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, slot_id, patient_name, patient_email, seats_booked, status, created_at, expires_at
        FROM bookings
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn set_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: BookingStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE bookings
        SET status = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Flips an expired pending booking to failed and returns its seat count.
/// The status and expiry predicates make the sweep idempotent: a booking
/// that was confirmed, cancelled, or already reclaimed matches nothing.
pub async fn mark_expired_failed(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE bookings
        SET status = 'failed'
        WHERE id = $1 AND status = 'pending' AND expires_at <= $2
        RETURNING seats_booked
        "#,
    )
    .bind(id)
    .bind(now)
    .fetch_optional(&mut **tx)
    .await
}
