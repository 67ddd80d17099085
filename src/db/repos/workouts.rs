use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::Workout;

const COLUMNS: &str = "id, user_id, name, started_at, ended_at, notes, created_at";

pub async fn create(
    conn: impl PgExecutor<'_>,
    user_id: Uuid,
    name: Option<&str>,
    notes: Option<&str>,
    started_at: DateTime<Utc>,
) -> Result<Workout, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        r#"
        INSERT INTO workouts (user_id, name, notes, started_at)
        VALUES ($1, $2, $3, $4)
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(user_id)
    .bind(name)
    .bind(notes)
    .bind(started_at)
    .fetch_one(conn)
    .await
}

pub async fn get(conn: impl PgExecutor<'_>, id: Uuid) -> Result<Option<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!("SELECT {COLUMNS} FROM workouts WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Load a workout with a row-level lock. Serializes concurrent set logging
/// against the same workout so count-then-insert set numbering cannot race.
pub async fn get_for_update(
    conn: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        "SELECT {COLUMNS} FROM workouts WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn list_for_user(
    conn: impl PgExecutor<'_>,
    user_id: Uuid,
    skip: i64,
    limit: i64,
) -> Result<Vec<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        "SELECT {COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY started_at DESC OFFSET $2 LIMIT $3"
    ))
    .bind(user_id)
    .bind(skip)
    .bind(limit)
    .fetch_all(conn)
    .await
}

/// Set `ended_at` on an active workout. Returns None when the workout is
/// already ended, so the first transition is never overwritten even under
/// concurrent end calls.
pub async fn set_ended(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    ended_at: DateTime<Utc>,
) -> Result<Option<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        "UPDATE workouts SET ended_at = $2 WHERE id = $1 AND ended_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(ended_at)
    .fetch_optional(conn)
    .await
}

/// Partial update; absent fields keep their current value.
pub async fn update_fields(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    name: Option<&str>,
    notes: Option<&str>,
) -> Result<Workout, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        r#"
        UPDATE workouts
        SET name = COALESCE($2, name), notes = COALESCE($3, notes)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(name)
    .bind(notes)
    .fetch_one(conn)
    .await
}

/// Batch lookup used for recent-session dates. Result order is not guaranteed.
pub async fn get_many_by_id(
    conn: impl PgExecutor<'_>,
    ids: &[Uuid],
) -> Result<Vec<Workout>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, Workout>(&format!(
        "SELECT {COLUMNS} FROM workouts WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(conn)
    .await
}
