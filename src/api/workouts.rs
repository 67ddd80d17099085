use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{AppState, CurrentUser};
use crate::db::models::Workout;
use crate::error::AppError;
use crate::services::workout_service;

#[derive(Debug, Deserialize)]
pub struct WorkoutCreate {
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkoutUpdate {
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct WorkoutResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            user_id: workout.user_id,
            name: workout.name,
            started_at: workout.started_at,
            ended_at: workout.ended_at,
            notes: workout.notes,
            created_at: workout.created_at,
        }
    }
}

pub async fn start_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<WorkoutCreate>,
) -> Result<(StatusCode, Json<WorkoutResponse>), AppError> {
    let workout = workout_service::start_workout(
        &state.pool,
        user.id,
        body.name.as_deref(),
        body.notes.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(WorkoutResponse::from(workout))))
}

pub async fn list_workouts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<WorkoutResponse>>, AppError> {
    let workouts =
        workout_service::get_user_workouts(&state.pool, user.id, page.skip, page.limit).await?;
    Ok(Json(workouts.into_iter().map(WorkoutResponse::from).collect()))
}

pub async fn get_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<WorkoutResponse>, AppError> {
    let workout = workout_service::get_workout(&state.pool, workout_id, user.id).await?;
    Ok(Json(WorkoutResponse::from(workout)))
}

/// End a workout. A second end call on the same workout is a Conflict, so
/// the recorded end time never moves.
pub async fn end_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<WorkoutResponse>, AppError> {
    let workout = workout_service::end_workout(&state.pool, workout_id, user.id).await?;
    Ok(Json(WorkoutResponse::from(workout)))
}

pub async fn update_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workout_id): Path<Uuid>,
    Json(body): Json<WorkoutUpdate>,
) -> Result<Json<WorkoutResponse>, AppError> {
    let workout = workout_service::update_workout(
        &state.pool,
        workout_id,
        user.id,
        body.name.as_deref(),
        body.notes.as_deref(),
    )
    .await?;
    Ok(Json(WorkoutResponse::from(workout)))
}
