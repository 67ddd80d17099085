use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use uuid::Uuid;

use crate::api::{AppState, CurrentUser};
use crate::db::models::WorkoutSet;
use crate::error::AppError;
use crate::services::set_service::{self, RecommendationOut, SetCreate};

#[derive(Debug, Serialize)]
pub struct SetResponse {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub user_id: Uuid,
    pub set_number: i32,
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<f64>,
    pub is_warmup: bool,
    pub logged_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<WorkoutSet> for SetResponse {
    fn from(set: WorkoutSet) -> Self {
        Self {
            id: set.id,
            workout_id: set.workout_id,
            exercise_id: set.exercise_id,
            user_id: set.user_id,
            set_number: set.set_number,
            weight_kg: set.weight_kg.to_f64().unwrap_or(0.0),
            reps: set.reps,
            rpe: set.rpe.and_then(|r| r.to_f64()),
            is_warmup: set.is_warmup,
            logged_at: set.logged_at,
            created_at: set.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub suggested_weight_kg: f64,
    pub suggested_reps: i32,
    pub explanation: String,
    pub confidence: String,
    pub model_used: String,
    pub latency_ms: i32,
}

impl From<RecommendationOut> for RecommendationResponse {
    fn from(rec: RecommendationOut) -> Self {
        Self {
            suggested_weight_kg: rec.suggested_weight_kg,
            suggested_reps: rec.suggested_reps,
            explanation: rec.explanation,
            confidence: rec.confidence,
            model_used: rec.model_used,
            latency_ms: rec.latency_ms,
        }
    }
}

/// Response for logging a set: the set plus the recommendation (null for
/// warmups).
#[derive(Debug, Serialize)]
pub struct SetWithRecommendation {
    pub set: SetResponse,
    pub recommendation: Option<RecommendationResponse>,
}

pub async fn log_set(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workout_id): Path<Uuid>,
    Json(body): Json<SetCreate>,
) -> Result<(StatusCode, Json<SetWithRecommendation>), AppError> {
    let logged = set_service::log_set(&state.pool, &state.ai, workout_id, body, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(SetWithRecommendation {
            set: SetResponse::from(logged.set),
            recommendation: logged.recommendation.map(RecommendationResponse::from),
        }),
    ))
}

pub async fn list_sets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<Vec<SetResponse>>, AppError> {
    let sets = set_service::get_sets_for_workout(&state.pool, workout_id, user.id).await?;
    Ok(Json(sets.into_iter().map(SetResponse::from).collect()))
}

pub async fn delete_set(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(set_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    set_service::delete_set(&state.pool, set_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
