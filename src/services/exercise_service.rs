use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Exercise;
use crate::db::repos::exercises;
use crate::error::AppError;

/// Create a new global exercise (no owner).
pub async fn create_exercise(
    pool: &PgPool,
    name: &str,
    muscle_group: &str,
    equipment_type: Option<&str>,
    is_compound: bool,
) -> Result<Exercise, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if muscle_group.trim().is_empty() {
        return Err(AppError::Validation(
            "muscle_group must not be empty".to_string(),
        ));
    }
    Ok(exercises::create(pool, name, muscle_group, equipment_type, is_compound).await?)
}

pub async fn get_exercise_or_404(pool: &PgPool, exercise_id: Uuid) -> Result<Exercise, AppError> {
    exercises::get(pool, exercise_id)
        .await?
        .ok_or(AppError::NotFound("Exercise"))
}

/// List global exercises with an optional name search.
pub async fn list_exercises(
    pool: &PgPool,
    search: Option<&str>,
) -> Result<Vec<Exercise>, AppError> {
    Ok(exercises::list_global(pool, search).await?)
}
