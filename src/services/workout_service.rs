use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Workout;
use crate::db::repos::workouts;
use crate::error::AppError;

/// Start a new workout for the user with `started_at = now`.
pub async fn start_workout(
    pool: &PgPool,
    user_id: Uuid,
    name: Option<&str>,
    notes: Option<&str>,
) -> Result<Workout, AppError> {
    Ok(workouts::create(pool, user_id, name, notes, Utc::now()).await?)
}

async fn get_owned(pool: &PgPool, workout_id: Uuid, user_id: Uuid) -> Result<Workout, AppError> {
    let workout = workouts::get(pool, workout_id)
        .await?
        .ok_or(AppError::NotFound("Workout"))?;
    if workout.user_id != user_id {
        return Err(AppError::Forbidden("Not allowed to modify this workout"));
    }
    Ok(workout)
}

/// End a workout. The `ended_at` transition is monotonic: the conditional
/// update only touches an active workout, so a second end call (sequential
/// or concurrent) is rejected and the first value is never overwritten.
pub async fn end_workout(
    pool: &PgPool,
    workout_id: Uuid,
    user_id: Uuid,
) -> Result<Workout, AppError> {
    get_owned(pool, workout_id, user_id).await?;
    workouts::set_ended(pool, workout_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::Conflict("Workout has already ended".to_string()))
}

pub async fn get_workout(
    pool: &PgPool,
    workout_id: Uuid,
    user_id: Uuid,
) -> Result<Workout, AppError> {
    get_owned(pool, workout_id, user_id).await
}

pub async fn get_user_workouts(
    pool: &PgPool,
    user_id: Uuid,
    skip: i64,
    limit: i64,
) -> Result<Vec<Workout>, AppError> {
    Ok(workouts::list_for_user(pool, user_id, skip, limit).await?)
}

/// Update name and/or notes; fields left out of the request are untouched.
pub async fn update_workout(
    pool: &PgPool,
    workout_id: Uuid,
    user_id: Uuid,
    name: Option<&str>,
    notes: Option<&str>,
) -> Result<Workout, AppError> {
    let workout = get_owned(pool, workout_id, user_id).await?;
    if name.is_none() && notes.is_none() {
        return Ok(workout);
    }
    Ok(workouts::update_fields(pool, workout_id, name, notes).await?)
}
