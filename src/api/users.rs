use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::{AppState, CurrentUser};
use crate::db::models::User;
use crate::error::AppError;
use crate::services::stats_service::{self, ExerciseStats, UserOverview};
use crate::services::exercise_service;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Current user's profile, without the password hash.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn my_overview_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserOverview>, AppError> {
    let overview = stats_service::get_user_overview(&state.pool, user.id).await?;
    Ok(Json(overview))
}

/// Exercise-specific stats for the current user; 404 when the exercise does
/// not exist.
pub async fn my_exercise_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<ExerciseStats>, AppError> {
    exercise_service::get_exercise_or_404(&state.pool, exercise_id).await?;
    let stats = stats_service::get_exercise_stats(&state.pool, user.id, exercise_id).await?;
    Ok(Json(stats))
}
