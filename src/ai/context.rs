//! Context assembly for set recommendations: everything the AI (and the rule
//! engine) needs to know about the athlete's session and history, gathered in
//! one place from the caller's transaction.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::db::models::WorkoutSet;
use crate::db::repos::{exercises, sets, workouts};
use crate::error::AppError;

const RECENT_SET_LIMIT: i64 = 60;
const RECENT_SESSION_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSet {
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<f64>,
    pub set_number: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySet {
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<f64>,
}

/// One prior session for this exercise: the workout's start date (ISO) and
/// its sets in logged order.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub date: String,
    pub sets: Vec<HistorySet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutContext {
    pub exercise_name: String,
    pub muscle_group: String,
    pub equipment_type: String,
    pub is_compound: bool,
    pub current_session_sets: Vec<SessionSet>,
    pub recent_sessions: Vec<SessionSummary>,
    pub estimated_1rm: Option<f64>,
    pub max_weight_ever: Option<f64>,
    pub total_sets_today: i64,
    pub workout_duration_minutes: i64,
}

fn dec_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

// Epley formula: estimated 1RM = weight * (1 + reps / 30)
fn epley_1rm(weight_kg: f64, reps: i32) -> f64 {
    weight_kg * (1.0 + f64::from(reps) / 30.0)
}

/// Workout ids in order of first appearance, excluding the current workout.
/// Input must already be ordered by `logged_at` DESC so the first-seen order
/// is most-recent-session first.
fn first_seen_workouts(
    ordered_workout_ids: impl IntoIterator<Item = Uuid>,
    current_workout_id: Uuid,
    take: usize,
) -> Vec<Uuid> {
    let mut seen: Vec<Uuid> = Vec::new();
    for workout_id in ordered_workout_ids {
        if workout_id == current_workout_id {
            continue;
        }
        if !seen.contains(&workout_id) {
            seen.push(workout_id);
        }
        if seen.len() == take {
            break;
        }
    }
    seen
}

/// Build a fully populated context for a recommendation: exercise details,
/// current-session sets, the last three sessions for this exercise, Epley
/// 1RM over recent history, all-time best, today's volume, and elapsed
/// workout duration.
pub async fn build_context(
    conn: &mut PgConnection,
    workout_id: Uuid,
    exercise_id: Uuid,
    user_id: Uuid,
) -> Result<WorkoutContext, AppError> {
    let exercise = exercises::get(&mut *conn, exercise_id)
        .await?
        .ok_or(AppError::NotFound("Exercise"))?;

    let workout = workouts::get(&mut *conn, workout_id)
        .await?
        .ok_or(AppError::NotFound("Workout"))?;
    if workout.user_id != user_id {
        return Err(AppError::Forbidden("Workout does not belong to user"));
    }

    let current_sets =
        sets::get_for_workout_and_exercise(&mut *conn, workout_id, exercise_id).await?;
    let current_session_sets = current_sets
        .iter()
        .map(|s| SessionSet {
            weight_kg: dec_f64(s.weight_kg),
            reps: s.reps,
            rpe: s.rpe.map(dec_f64),
            set_number: s.set_number,
        })
        .collect();

    let recent_sets =
        sets::get_recent_for_exercise(&mut *conn, user_id, exercise_id, RECENT_SET_LIMIT).await?;

    let mut sets_by_workout: HashMap<Uuid, Vec<&WorkoutSet>> = HashMap::new();
    for s in &recent_sets {
        sets_by_workout.entry(s.workout_id).or_default().push(s);
    }
    let session_workout_ids = first_seen_workouts(
        recent_sets.iter().map(|s| s.workout_id),
        workout_id,
        RECENT_SESSION_LIMIT,
    );

    let mut recent_sessions = Vec::new();
    if !session_workout_ids.is_empty() {
        let session_workouts = workouts::get_many_by_id(&mut *conn, &session_workout_ids).await?;
        let started_by_id: HashMap<Uuid, _> = session_workouts
            .iter()
            .map(|w| (w.id, w.started_at))
            .collect();
        for wid in &session_workout_ids {
            let Some(session_sets) = sets_by_workout.get(wid) else {
                continue;
            };
            let date = started_by_id
                .get(wid)
                .map(|started| started.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            recent_sessions.push(SessionSummary {
                date,
                sets: session_sets
                    .iter()
                    .map(|s| HistorySet {
                        weight_kg: dec_f64(s.weight_kg),
                        reps: s.reps,
                        rpe: s.rpe.map(dec_f64),
                    })
                    .collect(),
            });
        }
    }

    let estimated_1rm = recent_sets
        .iter()
        .map(|s| epley_1rm(dec_f64(s.weight_kg), s.reps))
        .fold(None::<f64>, |best, value| {
            Some(best.map_or(value, |b| b.max(value)))
        })
        .map(|best| (best * 100.0).round() / 100.0);

    let max_weight_ever = sets::max_weight_for_exercise(&mut *conn, user_id, exercise_id)
        .await?
        .map(dec_f64);

    let total_sets_today = sets::count_in_workout(&mut *conn, workout_id).await?;

    let workout_duration_minutes = (Utc::now() - workout.started_at).num_minutes().max(0);

    Ok(WorkoutContext {
        exercise_name: exercise.name,
        muscle_group: exercise.muscle_group,
        equipment_type: exercise.equipment_type.unwrap_or_default(),
        is_compound: exercise.is_compound,
        current_session_sets,
        recent_sessions,
        estimated_1rm,
        max_weight_ever,
        total_sets_today,
        workout_duration_minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epley_formula() {
        assert!((epley_1rm(100.0, 1) - 103.33).abs() < 0.01);
        assert!((epley_1rm(60.0, 10) - 80.0).abs() < 1e-9);
        assert!((epley_1rm(0.0, 5)).abs() < 1e-9);
    }

    #[test]
    fn test_first_seen_workouts_preserves_order_and_dedupes() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let current = Uuid::new_v4();
        let ordered = vec![a, a, b, a, c, b];
        assert_eq!(first_seen_workouts(ordered, current, 3), vec![a, b, c]);
    }

    #[test]
    fn test_first_seen_workouts_excludes_current_workout() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let current = Uuid::new_v4();
        let ordered = vec![current, a, current, b];
        assert_eq!(first_seen_workouts(ordered, current, 3), vec![a, b]);
    }

    #[test]
    fn test_first_seen_workouts_caps_at_limit() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let current = Uuid::new_v4();
        let picked = first_seen_workouts(ids.iter().copied(), current, 3);
        assert_eq!(picked, ids[..3].to_vec());
    }
}
