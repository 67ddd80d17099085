//! User and exercise aggregations. All heavy lifting happens in SQL; only
//! the day-streak walk runs over fetched rows.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct ExerciseStats {
    pub estimated_1rm: Option<f64>,
    pub max_weight_kg: Option<f64>,
    pub total_volume_kg: Option<f64>,
    pub total_sets: i64,
    pub sessions_count: i64,
    pub last_session_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserOverview {
    pub total_workouts: i64,
    pub total_sets: i64,
    pub total_volume_kg: f64,
    pub most_trained_muscle: Option<String>,
    pub favourite_exercise: Option<String>,
    pub active_streak_days: i64,
}

#[derive(sqlx::FromRow)]
struct ExerciseAggRow {
    max_weight_kg: Option<Decimal>,
    total_volume_kg: Decimal,
    total_sets: i64,
    sessions_count: i64,
    last_session_date: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct SetTotalsRow {
    total_sets: i64,
    total_volume_kg: Decimal,
}

/// Aggregate stats for one exercise, plus Epley 1RM from the best set.
pub async fn get_exercise_stats(
    pool: &PgPool,
    user_id: Uuid,
    exercise_id: Uuid,
) -> Result<ExerciseStats, AppError> {
    let agg = sqlx::query_as::<_, ExerciseAggRow>(
        r#"
        SELECT MAX(weight_kg)                          AS max_weight_kg,
               COALESCE(SUM(weight_kg * reps), 0)      AS total_volume_kg,
               COUNT(id)                               AS total_sets,
               COUNT(DISTINCT workout_id)              AS sessions_count,
               MAX(logged_at)                          AS last_session_date
        FROM sets
        WHERE user_id = $1 AND exercise_id = $2
        "#,
    )
    .bind(user_id)
    .bind(exercise_id)
    .fetch_one(pool)
    .await?;

    if agg.total_sets == 0 {
        return Ok(ExerciseStats {
            estimated_1rm: None,
            max_weight_kg: None,
            total_volume_kg: None,
            total_sets: 0,
            sessions_count: 0,
            last_session_date: None,
        });
    }

    let max_weight_kg = agg.max_weight_kg.and_then(|d| d.to_f64());

    // Reps of the heaviest set drive the Epley estimate; ties resolve to the
    // highest rep count.
    let estimated_1rm = match (agg.max_weight_kg, max_weight_kg) {
        (Some(max_decimal), Some(max)) => {
            let reps = sqlx::query_scalar::<_, i32>(
                r#"
                SELECT reps FROM sets
                WHERE user_id = $1 AND exercise_id = $2 AND weight_kg = $3
                ORDER BY reps DESC
                LIMIT 1
                "#,
            )
            .bind(user_id)
            .bind(exercise_id)
            .bind(max_decimal)
            .fetch_optional(pool)
            .await?;
            reps.map(|r| {
                let one_rm = max * (1.0 + f64::from(r) / 30.0);
                (one_rm * 100.0).round() / 100.0
            })
        }
        _ => None,
    };

    Ok(ExerciseStats {
        estimated_1rm,
        max_weight_kg,
        total_volume_kg: agg.total_volume_kg.to_f64(),
        total_sets: agg.total_sets,
        sessions_count: agg.sessions_count,
        last_session_date: agg
            .last_session_date
            .map(|dt| dt.date_naive().to_string()),
    })
}

fn streak_ending_today(workout_dates: &HashSet<NaiveDate>, today: NaiveDate) -> i64 {
    let mut streak = 0;
    let mut day = today;
    while workout_dates.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}

/// Overview stats: completed workout count, set count, total volume, most
/// trained muscle group, favourite exercise, and the active day-streak.
pub async fn get_user_overview(pool: &PgPool, user_id: Uuid) -> Result<UserOverview, AppError> {
    let total_workouts = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(id) FROM workouts WHERE user_id = $1 AND ended_at IS NOT NULL",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let totals = sqlx::query_as::<_, SetTotalsRow>(
        r#"
        SELECT COUNT(id)                          AS total_sets,
               COALESCE(SUM(weight_kg * reps), 0) AS total_volume_kg
        FROM sets
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let most_trained_muscle = sqlx::query_scalar::<_, String>(
        r#"
        SELECT e.muscle_group
        FROM sets s
        JOIN exercises e ON s.exercise_id = e.id
        WHERE s.user_id = $1
        GROUP BY e.muscle_group
        ORDER BY COUNT(s.id) DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let favourite_exercise = sqlx::query_scalar::<_, String>(
        r#"
        SELECT e.name
        FROM sets s
        JOIN exercises e ON s.exercise_id = e.id
        WHERE s.user_id = $1
        GROUP BY e.id, e.name
        ORDER BY COUNT(s.id) DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let workout_dates: HashSet<NaiveDate> = sqlx::query_scalar::<_, NaiveDate>(
        "SELECT DISTINCT ended_at::date FROM workouts WHERE user_id = $1 AND ended_at IS NOT NULL",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .collect();

    let active_streak_days = streak_ending_today(&workout_dates, Utc::now().date_naive());

    Ok(UserOverview {
        total_workouts,
        total_sets: totals.total_sets,
        total_volume_kg: totals.total_volume_kg.to_f64().unwrap_or(0.0),
        most_trained_muscle,
        favourite_exercise,
        active_streak_days,
    })
}
