use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::WorkoutSet;

const COLUMNS: &str = "id, workout_id, exercise_id, user_id, set_number, weight_kg, reps, rpe, \
                       is_warmup, logged_at, created_at";

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    conn: impl PgExecutor<'_>,
    workout_id: Uuid,
    exercise_id: Uuid,
    user_id: Uuid,
    set_number: i32,
    weight_kg: Decimal,
    reps: i32,
    rpe: Option<Decimal>,
    is_warmup: bool,
) -> Result<WorkoutSet, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSet>(&format!(
        r#"
        INSERT INTO sets (workout_id, exercise_id, user_id, set_number, weight_kg, reps, rpe, is_warmup)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(workout_id)
    .bind(exercise_id)
    .bind(user_id)
    .bind(set_number)
    .bind(weight_kg)
    .bind(reps)
    .bind(rpe)
    .bind(is_warmup)
    .fetch_one(conn)
    .await
}

pub async fn get(conn: impl PgExecutor<'_>, id: Uuid) -> Result<Option<WorkoutSet>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSet>(&format!("SELECT {COLUMNS} FROM sets WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn delete(conn: impl PgExecutor<'_>, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sets WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn get_for_workout(
    conn: impl PgExecutor<'_>,
    workout_id: Uuid,
) -> Result<Vec<WorkoutSet>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSet>(&format!(
        "SELECT {COLUMNS} FROM sets WHERE workout_id = $1 ORDER BY set_number"
    ))
    .bind(workout_id)
    .fetch_all(conn)
    .await
}

pub async fn get_for_workout_and_exercise(
    conn: impl PgExecutor<'_>,
    workout_id: Uuid,
    exercise_id: Uuid,
) -> Result<Vec<WorkoutSet>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSet>(&format!(
        "SELECT {COLUMNS} FROM sets WHERE workout_id = $1 AND exercise_id = $2 ORDER BY set_number"
    ))
    .bind(workout_id)
    .bind(exercise_id)
    .fetch_all(conn)
    .await
}

pub async fn get_recent_for_exercise(
    conn: impl PgExecutor<'_>,
    user_id: Uuid,
    exercise_id: Uuid,
    limit: i64,
) -> Result<Vec<WorkoutSet>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSet>(&format!(
        "SELECT {COLUMNS} FROM sets WHERE user_id = $1 AND exercise_id = $2 \
         ORDER BY logged_at DESC LIMIT $3"
    ))
    .bind(user_id)
    .bind(exercise_id)
    .bind(limit)
    .fetch_all(conn)
    .await
}

/// Total sets in a workout across all exercises.
pub async fn count_in_workout(
    conn: impl PgExecutor<'_>,
    workout_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM sets WHERE workout_id = $1")
        .bind(workout_id)
        .fetch_one(conn)
        .await
}

pub async fn count_for_workout_and_exercise(
    conn: impl PgExecutor<'_>,
    workout_id: Uuid,
    exercise_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(id) FROM sets WHERE workout_id = $1 AND exercise_id = $2",
    )
    .bind(workout_id)
    .bind(exercise_id)
    .fetch_one(conn)
    .await
}

pub async fn max_weight_for_exercise(
    conn: impl PgExecutor<'_>,
    user_id: Uuid,
    exercise_id: Uuid,
) -> Result<Option<Decimal>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT MAX(weight_kg) FROM sets WHERE user_id = $1 AND exercise_id = $2",
    )
    .bind(user_id)
    .bind(exercise_id)
    .fetch_one(conn)
    .await
}
