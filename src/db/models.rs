// Relationship graph (centered on WorkoutSet):
// User ──< WorkoutSet >── Exercise
// Workout ──< WorkoutSet
// WorkoutSet ──< Recommendation (optional link, SET NULL on delete)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub hashed_pw: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: String,
    pub equipment_type: Option<String>,
    pub is_compound: bool,
    pub created_by: Option<Uuid>,
    pub is_global: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Workout {
    /// A workout is active until it is ended; closed workouts reject set inserts.
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutSet {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub user_id: Uuid,
    pub set_number: i32,
    pub weight_kg: Decimal,
    pub reps: i32,
    pub rpe: Option<Decimal>,
    pub is_warmup: bool,
    pub logged_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_id: Uuid,
    pub set_id: Option<Uuid>,
    pub exercise_id: Uuid,
    pub recommended_weight: Decimal,
    pub recommended_reps: i32,
    pub explanation: String,
    pub confidence: String,
    pub ai_provider: String,
    pub model_used: String,
    pub latency_ms: i32,
    pub was_followed: Option<bool>,
    pub created_at: DateTime<Utc>,
}
