use crate::models::DbDoctor;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_doctor(
    pool: &Pool<Postgres>,
    name: &str,
    specialization: &str,
) -> Result<DbDoctor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, name, specialization, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, specialization, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(specialization)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(doctor)
}

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbDoctor>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doctor)
}

pub async fn list_doctors(pool: &Pool<Postgres>) -> Result<Vec<DbDoctor>> {
    let doctors = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, created_at
        FROM doctors
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(doctors)
}
