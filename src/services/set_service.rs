//! Set logging: ownership/lifecycle checks, set insertion, recommendation
//! selection (AI, then rule engine, then minimal fallback), and persistence
//! of both rows in one transaction.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::ai::context::{WorkoutContext, build_context};
use crate::ai::{AiError, AiProvider};
use crate::db::models::WorkoutSet;
use crate::db::repos::recommendations::{self, NewRecommendation};
use crate::db::repos::{sets, workouts};
use crate::error::AppError;
use crate::services::rule_engine;

const AI_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Deserialize)]
pub struct SetCreate {
    pub exercise_id: Uuid,
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<f64>,
    #[serde(default)]
    pub is_warmup: bool,
}

impl SetCreate {
    fn validate(&self) -> Result<(), AppError> {
        if !self.weight_kg.is_finite() || self.weight_kg < 0.0 {
            return Err(AppError::Validation(
                "weight_kg must be a non-negative number".to_string(),
            ));
        }
        if self.reps <= 0 {
            return Err(AppError::Validation("reps must be positive".to_string()));
        }
        if let Some(rpe) = self.rpe
            && !(1.0..=10.0).contains(&rpe)
        {
            return Err(AppError::Validation(
                "rpe must be between 1 and 10".to_string(),
            ));
        }
        Ok(())
    }
}

/// Recommendation as returned to the caller; mirrors what was persisted.
#[derive(Debug, Clone)]
pub struct RecommendationOut {
    pub suggested_weight_kg: f64,
    pub suggested_reps: i32,
    pub explanation: String,
    pub confidence: String,
    pub model_used: String,
    pub latency_ms: i32,
}

#[derive(Debug)]
pub struct LoggedSet {
    pub set: WorkoutSet,
    pub recommendation: Option<RecommendationOut>,
}

fn to_decimal(value: f64, scale: u32) -> Result<Decimal, AppError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(scale))
        .ok_or_else(|| AppError::Validation(format!("value {value} is not representable")))
}

/// Log a set for an active workout and attach a recommendation unless the
/// set is a warmup.
///
/// Exactly one recommendation row is persisted per non-warmup set, and set
/// plus recommendation are committed together or not at all. AI and
/// context-builder failures never fail the request; they downgrade to the
/// rule engine and the minimal fallback respectively.
pub async fn log_set(
    pool: &PgPool,
    ai: &AiProvider,
    workout_id: Uuid,
    set_in: SetCreate,
    user_id: Uuid,
) -> Result<LoggedSet, AppError> {
    set_in.validate()?;

    let mut tx = pool.begin().await?;

    // The row lock serializes concurrent set logging on this workout, so the
    // count below cannot race another insert.
    let workout = workouts::get_for_update(&mut *tx, workout_id)
        .await?
        .ok_or(AppError::NotFound("Workout"))?;
    if workout.user_id != user_id {
        return Err(AppError::Forbidden("Not allowed to modify this workout"));
    }
    if !workout.is_active() {
        return Err(AppError::Conflict("Workout has already ended".to_string()));
    }

    let existing =
        sets::count_for_workout_and_exercise(&mut *tx, workout_id, set_in.exercise_id).await?;
    let set_number = existing as i32 + 1;

    let weight = to_decimal(set_in.weight_kg, 2)?;
    let rpe = set_in.rpe.map(|r| to_decimal(r, 1)).transpose()?;

    let new_set = sets::insert(
        &mut *tx,
        workout_id,
        set_in.exercise_id,
        user_id,
        set_number,
        weight,
        set_in.reps,
        rpe,
        set_in.is_warmup,
    )
    .await?;

    if set_in.is_warmup {
        tx.commit().await?;
        return Ok(LoggedSet {
            set: new_set,
            recommendation: None,
        });
    }

    let ctx = match build_context(&mut *tx, workout_id, set_in.exercise_id, user_id).await {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            tracing::warn!(error = %e, "recommendation.context_failed");
            None
        }
    };

    let recommendation = match &ctx {
        Some(ctx) => recommend_with_ai(ai, ctx, &set_in).await,
        None => {
            let rule = rule_engine::minimal_fallback(set_in.weight_kg, set_in.reps, set_in.rpe);
            rule_based_out(rule)
        }
    };

    recommendations::insert(
        &mut *tx,
        NewRecommendation {
            user_id,
            workout_id,
            set_id: new_set.id,
            exercise_id: set_in.exercise_id,
            recommended_weight: to_decimal(recommendation.suggested_weight_kg, 2)?,
            recommended_reps: recommendation.suggested_reps,
            explanation: &recommendation.explanation,
            confidence: &recommendation.confidence,
            ai_provider: provider_tag(&recommendation.model_used),
            model_used: &recommendation.model_used,
            latency_ms: recommendation.latency_ms,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(LoggedSet {
        set: new_set,
        recommendation: Some(recommendation),
    })
}

async fn recommend_with_ai(
    ai: &AiProvider,
    ctx: &WorkoutContext,
    set_in: &SetCreate,
) -> RecommendationOut {
    let result = tokio::time::timeout(AI_TIMEOUT, ai.recommend(ctx))
        .await
        .unwrap_or(Err(AiError::Timeout));

    match result {
        Ok(rec) => RecommendationOut {
            suggested_weight_kg: rec.suggested_weight_kg,
            suggested_reps: rec.suggested_reps,
            explanation: rec.explanation,
            confidence: rec.confidence.as_str().to_string(),
            model_used: rec.model_used,
            latency_ms: rec.latency_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "ai.fallback");
            let rule = rule_engine::rule_based_recommendation(
                ctx,
                set_in.weight_kg,
                set_in.reps,
                set_in.rpe,
            );
            rule_based_out(rule)
        }
    }
}

fn rule_based_out(rule: rule_engine::RuleRecommendation) -> RecommendationOut {
    RecommendationOut {
        suggested_weight_kg: rule.weight_kg,
        suggested_reps: rule.reps,
        explanation: rule.explanation,
        confidence: "low".to_string(),
        model_used: "rule-based".to_string(),
        latency_ms: 0,
    }
}

fn provider_tag(model_used: &str) -> &'static str {
    if model_used == "rule-based" {
        "fallback"
    } else if model_used.to_lowercase().contains("gemini") {
        "gemini"
    } else {
        "ai"
    }
}

/// List sets for a workout. The user must own the workout.
pub async fn get_sets_for_workout(
    pool: &PgPool,
    workout_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<WorkoutSet>, AppError> {
    let workout = workouts::get(pool, workout_id)
        .await?
        .ok_or(AppError::NotFound("Workout"))?;
    if workout.user_id != user_id {
        return Err(AppError::Forbidden("Not allowed to view this workout"));
    }
    Ok(sets::get_for_workout(pool, workout_id).await?)
}

/// Delete a set. The user must own it; referencing recommendations keep
/// their row with `set_id` nulled by the FK rule.
pub async fn delete_set(pool: &PgPool, set_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let set = sets::get(pool, set_id)
        .await?
        .ok_or(AppError::NotFound("Set"))?;
    if set.user_id != user_id {
        return Err(AppError::Forbidden("Not allowed to delete this set"));
    }
    sets::delete(pool, set_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_tag() {
        assert_eq!(provider_tag("gemini-2.0-flash"), "gemini");
        assert_eq!(provider_tag("models/Gemini-1.5-pro"), "gemini");
        assert_eq!(provider_tag("gpt-4o-mini"), "ai");
        assert_eq!(provider_tag("rule-based"), "fallback");
    }

    #[test]
    fn test_set_create_validation() {
        let base = SetCreate {
            exercise_id: Uuid::new_v4(),
            weight_kg: 60.0,
            reps: 8,
            rpe: Some(7.5),
            is_warmup: false,
        };
        assert!(base.validate().is_ok());

        let mut bad = base.clone();
        bad.weight_kg = -1.0;
        assert!(bad.validate().is_err());

        let mut bad = base.clone();
        bad.reps = 0;
        assert!(bad.validate().is_err());

        let mut bad = base.clone();
        bad.rpe = Some(10.5);
        assert!(bad.validate().is_err());

        let mut ok = base.clone();
        ok.rpe = None;
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_rule_based_out_shape() {
        let out = rule_based_out(rule_engine::minimal_fallback(60.0, 8, Some(9.0)));
        assert_eq!(out.suggested_weight_kg, 60.0);
        assert_eq!(out.confidence, "low");
        assert_eq!(out.model_used, "rule-based");
        assert_eq!(out.latency_ms, 0);
    }
}
