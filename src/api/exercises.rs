use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::db::models::Exercise;
use crate::error::AppError;
use crate::services::exercise_service;

#[derive(Debug, Deserialize)]
pub struct ExerciseCreate {
    pub name: String,
    pub muscle_group: String,
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub is_compound: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseSearch {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: String,
    pub equipment_type: Option<String>,
    pub is_compound: bool,
    pub is_global: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Exercise> for ExerciseResponse {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name,
            muscle_group: exercise.muscle_group,
            equipment_type: exercise.equipment_type,
            is_compound: exercise.is_compound,
            is_global: exercise.is_global,
            created_at: exercise.created_at,
        }
    }
}

pub async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<ExerciseSearch>,
) -> Result<Json<Vec<ExerciseResponse>>, AppError> {
    let exercises =
        exercise_service::list_exercises(&state.pool, query.search.as_deref()).await?;
    Ok(Json(exercises.into_iter().map(ExerciseResponse::from).collect()))
}

pub async fn create_exercise(
    State(state): State<AppState>,
    Json(body): Json<ExerciseCreate>,
) -> Result<(StatusCode, Json<ExerciseResponse>), AppError> {
    let exercise = exercise_service::create_exercise(
        &state.pool,
        &body.name,
        &body.muscle_group,
        body.equipment_type.as_deref(),
        body.is_compound,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ExerciseResponse::from(exercise))))
}

pub async fn get_exercise(
    State(state): State<AppState>,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<ExerciseResponse>, AppError> {
    let exercise = exercise_service::get_exercise_or_404(&state.pool, exercise_id).await?;
    Ok(Json(ExerciseResponse::from(exercise)))
}
