use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::Recommendation;

pub struct NewRecommendation<'a> {
    pub user_id: Uuid,
    pub workout_id: Uuid,
    pub set_id: Uuid,
    pub exercise_id: Uuid,
    pub recommended_weight: Decimal,
    pub recommended_reps: i32,
    pub explanation: &'a str,
    pub confidence: &'a str,
    pub ai_provider: &'a str,
    pub model_used: &'a str,
    pub latency_ms: i32,
}

pub async fn insert(
    conn: impl PgExecutor<'_>,
    rec: NewRecommendation<'_>,
) -> Result<Recommendation, sqlx::Error> {
    sqlx::query_as::<_, Recommendation>(
        r#"
        INSERT INTO recommendations (
            user_id, workout_id, set_id, exercise_id,
            recommended_weight, recommended_reps, explanation, confidence,
            ai_provider, model_used, latency_ms
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, user_id, workout_id, set_id, exercise_id,
                  recommended_weight, recommended_reps, explanation, confidence,
                  ai_provider, model_used, latency_ms, was_followed, created_at
        "#,
    )
    .bind(rec.user_id)
    .bind(rec.workout_id)
    .bind(rec.set_id)
    .bind(rec.exercise_id)
    .bind(rec.recommended_weight)
    .bind(rec.recommended_reps)
    .bind(rec.explanation)
    .bind(rec.confidence)
    .bind(rec.ai_provider)
    .bind(rec.model_used)
    .bind(rec.latency_ms)
    .fetch_one(conn)
    .await
}
