use crate::models::DbSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

pub async fn create_slot(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    total_capacity: i32,
) -> Result<DbSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    // A new slot starts with every seat available.
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (id, doctor_id, start_time, end_time, total_capacity, available_seats, created_at)
        VALUES ($1, $2, $3, $4, $5, $5, $6)
        RETURNING id, doctor_id, start_time, end_time, total_capacity, available_seats, created_at
        "#,
    )
    .bind(id)
    .bind(doctor_id)
    .bind(start_time)
    .bind(end_time)
    .bind(total_capacity)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, doctor_id, start_time, end_time, total_capacity, available_seats, created_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slots_by_doctor_id(pool: &Pool<Postgres>, doctor_id: Uuid) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, doctor_id, start_time, end_time, total_capacity, available_seats, created_at
        FROM slots
        WHERE doctor_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Snapshot read of the availability counter, no locking. A slot shown as
/// available here may still be full by the time a booking attempt runs.
pub async fn get_slot_availability(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<i32>> {
    let available = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT available_seats
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(available)
}

// Capacity ledger operations. These run on an open transaction so the row
// lock taken by `lock_and_read` covers every following statement until
// commit or rollback.

/// Acquires the exclusive row lock for `slot_id` and returns the current
/// row, or `None` if the slot does not exist. Blocks while another
/// transaction holds the lock; the wait is bounded by the caller's
/// `lock_timeout` setting.
pub async fn lock_and_read(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: Uuid,
) -> Result<Option<DbSlot>, sqlx::Error> {
    sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, doctor_id, start_time, end_time, total_capacity, available_seats, created_at
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Caller must hold the row lock and have verified
/// `available_seats >= seats` in the same transaction.
pub async fn decrement(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: Uuid,
    seats: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE slots
        SET available_seats = available_seats - $2
        WHERE id = $1
        "#,
    )
    .bind(slot_id)
    .bind(seats)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Compensating release. LEAST keeps a double release from pushing the
/// counter past total capacity; the booking-status gate in the caller is
/// what makes releases idempotent.
pub async fn increment(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: Uuid,
    seats: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE slots
        SET available_seats = LEAST(total_capacity, available_seats + $2)
        WHERE id = $1
        "#,
    )
    .bind(slot_id)
    .bind(seats)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
