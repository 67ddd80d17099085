//! Rule-based set recommendation engine. Pure logic, no DB or async.
//!
//! Fatigue scoring: maximum score is 3 (signals 1-3 only). Signal 4
//! (duration) is an exclusive fallback and cannot combine with others. Hard
//! fatigue requires score >= 2; soft fatigue = 1.

use crate::ai::context::WorkoutContext;

const SIGNAL_REP_DROP: &str = "Rep drop";
const SIGNAL_RPE_SPIKE: &str = "RPE spike";
const SIGNAL_EXCESSIVE_VOLUME: &str = "Excessive volume";
const SIGNAL_DURATION: &str = "Duration";

const SUFFIX: &str = " | Rule-based suggestion.";

#[derive(Debug, Clone, PartialEq)]
pub struct RuleRecommendation {
    pub weight_kg: f64,
    pub reps: i32,
    pub explanation: String,
}

/// Round weight to the nearest 1.25 kg. Clamp to >= 0.
fn round_weight(weight_kg: f64) -> f64 {
    let clamped = weight_kg.max(0.0);
    (clamped / 1.25).round() * 1.25
}

/// Weight delta: 2.5 for compound, 1.25 for isolation.
fn delta(is_compound: bool) -> f64 {
    if is_compound { 2.5 } else { 1.25 }
}

/// Clamp a weight to 90% of the estimated 1RM (rounded down to a 1.25
/// multiple). Returns the clamped weight and any extra explanation part.
fn apply_1rm_cap(ctx: &WorkoutContext, weight: f64) -> (f64, Option<&'static str>) {
    let Some(one_rm) = ctx.estimated_1rm else {
        return (weight, None);
    };
    let cap = (0.9 * one_rm / 1.25).floor() * 1.25;
    if weight > cap {
        (round_weight(cap), Some("Capped at 90% estimated 1RM."))
    } else {
        (weight, None)
    }
}

/// Apply rules in strict priority order.
///
/// RPE >= 9 always fires the RPE-spike signal in Rule 1 (fatigue), so Rule 2
/// never needs a decrease outcome for high RPE; only maintain and increase
/// apply there.
pub fn rule_based_recommendation(
    ctx: &WorkoutContext,
    last_weight_kg: f64,
    last_reps: i32,
    last_rpe: Option<f64>,
) -> RuleRecommendation {
    let is_compound = ctx.is_compound;
    let mut parts: Vec<String> = Vec::new();

    // ── Rule 1: fatigue detection ────────────────────────────────────────
    let mut fatigue_signals: Vec<&str> = Vec::new();

    // Signal 1: rep drop (2+ sets, drop >= 3)
    if ctx.current_session_sets.len() >= 2 {
        let prev_reps = ctx.current_session_sets[ctx.current_session_sets.len() - 2].reps;
        if last_reps - prev_reps <= -3 {
            fatigue_signals.push(SIGNAL_REP_DROP);
        }
    }

    // Signal 2: RPE spike
    if last_rpe.is_some_and(|rpe| rpe >= 9.0) {
        fatigue_signals.push(SIGNAL_RPE_SPIKE);
    }

    // Signal 3: excessive volume
    if ctx.total_sets_today >= 18 {
        fatigue_signals.push(SIGNAL_EXCESSIVE_VOLUME);
    }

    // Signal 4 (duration) is an exclusive fallback. It only contributes to
    // the fatigue score when signals 1-3 all score 0, and can never combine
    // with other signals to produce hard fatigue.
    if fatigue_signals.is_empty() && ctx.workout_duration_minutes > 120 {
        fatigue_signals.push(SIGNAL_DURATION);
    }

    let soft_fatigue = fatigue_signals.len() == 1;
    let hard_fatigue = fatigue_signals.len() >= 2;

    if hard_fatigue {
        let step = delta(is_compound);
        let mut suggested_weight = round_weight((last_weight_kg - step).max(0.0));
        parts.push(format!(
            "{}: reducing load by {} kg.",
            fatigue_signals.join(" + "),
            step
        ));
        let (capped, cap_part) = apply_1rm_cap(ctx, suggested_weight);
        suggested_weight = capped;
        if let Some(cap_part) = cap_part {
            parts.push(cap_part.to_string());
        }
        parts.push(SUFFIX.to_string());
        return RuleRecommendation {
            weight_kg: suggested_weight,
            reps: last_reps,
            explanation: parts.join(" "),
        };
    }

    if soft_fatigue {
        let mut suggested_weight = round_weight(last_weight_kg);
        parts.push(fatigue_signals[0].to_string());
        parts.push(" — maintaining load.".to_string());
        let (capped, cap_part) = apply_1rm_cap(ctx, suggested_weight);
        suggested_weight = capped;
        if let Some(cap_part) = cap_part {
            parts.push(cap_part.to_string());
        }
        parts.push(SUFFIX.to_string());
        return RuleRecommendation {
            weight_kg: suggested_weight,
            reps: last_reps,
            explanation: parts.join(" "),
        };
    }

    // No fatigue. Proceed to Rule 2.
    let mut increase_suppressed = false;

    // ── Rule 2: RPE bands ────────────────────────────────────────────────
    // RPE >= 9 never reaches here (the spike signal fires above); the high
    // band below therefore maintains and must not decrease load.
    let mut suggested_weight;
    let suggested_reps = last_reps;
    match last_rpe {
        None => {
            suggested_weight = last_weight_kg;
            parts.push("RPE 7–8 (or unknown) — maintaining load.".to_string());
        }
        Some(rpe) if (7.0..=8.0).contains(&rpe) => {
            suggested_weight = last_weight_kg;
            parts.push("RPE 7–8 (or unknown) — maintaining load.".to_string());
        }
        Some(rpe) if rpe <= 6.0 => {
            let step = delta(is_compound);
            suggested_weight = last_weight_kg + step;
            parts.push(format!(
                "RPE {} — adding {} kg ({}).",
                rpe.trunc() as i32,
                step,
                if is_compound { "compound" } else { "isolation" }
            ));
        }
        Some(_) => {
            // rpe in (8, 9)
            suggested_weight = last_weight_kg;
            parts.push("RPE 7–8 (or unknown) — maintaining load.".to_string());
        }
    }
    suggested_weight = round_weight(suggested_weight.max(0.0));

    // ── Rule 3: session trend (only if 0 fatigue) ────────────────────────
    if ctx.current_session_sets.len() >= 2 {
        let prev = &ctx.current_session_sets[ctx.current_session_sets.len() - 2];
        let rep_drop = last_reps - prev.reps;
        let weight_dropped = last_weight_kg < prev.weight_kg;
        let trend_declining = rep_drop <= -2 || weight_dropped;
        if trend_declining && last_rpe.is_some_and(|rpe| rpe <= 6.0) {
            increase_suppressed = true;
            suggested_weight = round_weight(last_weight_kg);
            parts = vec![
                "Session trend declining — suppressing increase.".to_string(),
                format!(
                    "RPE {} noted but overridden.",
                    last_rpe.unwrap_or_default().trunc() as i32
                ),
            ];
        }
    }

    // ── Rule 4: recent session comparison ────────────────────────────────
    if !increase_suppressed
        && let Some(prior) = ctx.recent_sessions.first()
        && !prior.sets.is_empty()
    {
        let best_prior_weight = prior
            .sets
            .iter()
            .map(|s| s.weight_kg)
            .fold(f64::MIN, f64::max);
        if last_weight_kg < best_prior_weight && last_rpe.is_some_and(|rpe| rpe <= 6.0) {
            suggested_weight = round_weight(last_weight_kg);
            parts = vec!["Current weight below prior session best — suppressing increase.".to_string()];
        }
    }

    // ── Rule 5: 1RM cap, always applied last ─────────────────────────────
    let (capped, cap_part) = apply_1rm_cap(ctx, suggested_weight);
    suggested_weight = capped;
    if let Some(cap_part) = cap_part {
        parts.push(cap_part.to_string());
    }
    parts.push(SUFFIX.to_string());

    RuleRecommendation {
        weight_kg: round_weight(suggested_weight),
        reps: suggested_reps,
        explanation: parts.join(" "),
    }
}

/// Degraded path used when no context could be built. Intentionally simpler:
/// no rounding, no 1RM cap.
pub fn minimal_fallback(
    last_weight_kg: f64,
    last_reps: i32,
    last_rpe: Option<f64>,
) -> RuleRecommendation {
    let explanation = "AI unavailable. Rule-based suggestion.".to_string();
    if last_rpe.is_some_and(|rpe| rpe <= 7.0) {
        RuleRecommendation {
            weight_kg: last_weight_kg + 2.5,
            reps: last_reps,
            explanation,
        }
    } else {
        RuleRecommendation {
            weight_kg: last_weight_kg,
            reps: last_reps,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::context::{HistorySet, SessionSet, SessionSummary, WorkoutContext};

    struct CtxBuilder {
        ctx: WorkoutContext,
    }

    fn ctx() -> CtxBuilder {
        CtxBuilder {
            ctx: WorkoutContext {
                exercise_name: "Bench Press".to_string(),
                muscle_group: "chest".to_string(),
                equipment_type: "barbell".to_string(),
                is_compound: true,
                current_session_sets: vec![],
                recent_sessions: vec![],
                estimated_1rm: None,
                max_weight_ever: None,
                total_sets_today: 5,
                workout_duration_minutes: 60,
            },
        }
    }

    impl CtxBuilder {
        fn compound(mut self, is_compound: bool) -> Self {
            self.ctx.is_compound = is_compound;
            self
        }

        fn current_sets(mut self, sets: &[(f64, i32, Option<f64>)]) -> Self {
            self.ctx.current_session_sets = sets
                .iter()
                .enumerate()
                .map(|(i, &(weight_kg, reps, rpe))| SessionSet {
                    weight_kg,
                    reps,
                    rpe,
                    set_number: i as i32 + 1,
                })
                .collect();
            self
        }

        fn prior_session(mut self, sets: &[(f64, i32, Option<f64>)]) -> Self {
            self.ctx.recent_sessions.push(SessionSummary {
                date: "2025-02-20".to_string(),
                sets: sets
                    .iter()
                    .map(|&(weight_kg, reps, rpe)| HistorySet {
                        weight_kg,
                        reps,
                        rpe,
                    })
                    .collect(),
            });
            self
        }

        fn one_rm(mut self, value: f64) -> Self {
            self.ctx.estimated_1rm = Some(value);
            self
        }

        fn total_sets(mut self, count: i64) -> Self {
            self.ctx.total_sets_today = count;
            self
        }

        fn duration(mut self, minutes: i64) -> Self {
            self.ctx.workout_duration_minutes = minutes;
            self
        }

        fn build(self) -> WorkoutContext {
            self.ctx
        }
    }

    // ── RPE band tests (clean context, no fatigue signals) ──────────────

    #[test]
    fn test_rpe_5_compound_increase() {
        let rec = rule_based_recommendation(&ctx().build(), 60.0, 10, Some(5.0));
        assert_eq!(rec.weight_kg, 62.5);
        assert_eq!(rec.reps, 10);
        assert!(rec.explanation.contains("RPE 5 — adding 2.5 kg (compound)."));
        assert!(rec.explanation.contains("Rule-based suggestion."));
    }

    #[test]
    fn test_rpe_6_isolation_increase() {
        let rec = rule_based_recommendation(&ctx().compound(false).build(), 20.0, 12, Some(6.0));
        assert_eq!(rec.weight_kg, 21.25);
        assert_eq!(rec.reps, 12);
        assert!(rec.explanation.contains("RPE 6 — adding 1.25 kg (isolation)."));
    }

    #[test]
    fn test_rpe_7_maintain() {
        let rec = rule_based_recommendation(&ctx().build(), 60.0, 8, Some(7.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert_eq!(rec.reps, 8);
    }

    #[test]
    fn test_rpe_8_maintain() {
        let rec = rule_based_recommendation(&ctx().build(), 60.0, 8, Some(8.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert_eq!(rec.reps, 8);
    }

    #[test]
    fn test_rpe_none_maintain() {
        let rec = rule_based_recommendation(&ctx().build(), 60.0, 8, None);
        assert_eq!(rec.weight_kg, 60.0);
        assert_eq!(rec.reps, 8);
        assert!(rec.explanation.contains("RPE 7–8 (or unknown)"));
    }

    #[test]
    fn test_rpe_between_8_and_9_maintains_never_decreases() {
        let rec = rule_based_recommendation(&ctx().build(), 60.0, 8, Some(8.5));
        assert_eq!(rec.weight_kg, 60.0);
        assert_eq!(rec.reps, 8);
    }

    // ── Fatigue signal tests ────────────────────────────────────────────

    #[test]
    fn test_rpe_9_only_soft_fatigue_maintain() {
        let rec = rule_based_recommendation(&ctx().build(), 60.0, 8, Some(9.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert_eq!(rec.reps, 8);
        assert!(rec.explanation.contains("RPE spike"));
        assert!(rec.explanation.contains("maintaining"));
    }

    #[test]
    fn test_rep_drop_3_soft_fatigue_maintain() {
        let context = ctx()
            .current_sets(&[(60.0, 11, Some(7.0)), (60.0, 8, Some(5.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert_eq!(rec.reps, 8);
        assert!(rec.explanation.contains("Rep drop"));
        assert!(rec.explanation.contains("maintaining"));
    }

    #[test]
    fn test_rep_drop_2_is_session_trend_not_fatigue() {
        let context = ctx()
            .current_sets(&[(60.0, 10, Some(7.0)), (60.0, 8, Some(5.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert!(rec.explanation.contains("Session trend"));
        assert!(!rec.explanation.contains("Rep drop"));
    }

    #[test]
    fn test_total_sets_18_soft_fatigue_maintain() {
        let rec = rule_based_recommendation(&ctx().total_sets(18).build(), 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert!(rec.explanation.contains("Excessive volume"));
    }

    #[test]
    fn test_total_sets_17_no_fatigue() {
        let rec = rule_based_recommendation(&ctx().total_sets(17).build(), 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 62.5);
    }

    #[test]
    fn test_duration_121_only_soft_fatigue() {
        let rec = rule_based_recommendation(&ctx().duration(121).build(), 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert_eq!(rec.reps, 8);
        assert!(rec.explanation.contains("Duration"));
    }

    #[test]
    fn test_duration_never_combines_with_other_signals() {
        // Duration over the threshold AND a rep drop: only the rep drop
        // scores, so this stays soft fatigue.
        let context = ctx()
            .duration(121)
            .current_sets(&[(60.0, 11, Some(7.0)), (60.0, 8, Some(6.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(6.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert!(rec.explanation.contains("Rep drop"));
        assert!(!rec.explanation.contains("Duration"));
    }

    #[test]
    fn test_rep_drop_and_rpe9_hard_fatigue_compound() {
        let context = ctx()
            .current_sets(&[(60.0, 11, Some(7.0)), (60.0, 8, Some(9.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(9.0));
        assert_eq!(rec.weight_kg, 57.5);
        assert_eq!(rec.reps, 8);
        assert!(
            rec.explanation
                .contains("Rep drop + RPE spike: reducing load by 2.5 kg.")
        );
    }

    #[test]
    fn test_three_signals_hard_fatigue() {
        let context = ctx()
            .total_sets(18)
            .duration(121)
            .current_sets(&[(60.0, 11, Some(7.0)), (60.0, 8, Some(9.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(9.0));
        assert_eq!(rec.weight_kg, 57.5);
        assert!(rec.explanation.contains("Rep drop"));
        assert!(rec.explanation.contains("RPE spike"));
        assert!(rec.explanation.contains("Excessive volume"));
        assert!(!rec.explanation.contains("Duration"));
    }

    #[test]
    fn test_hard_fatigue_isolation_reduces_by_1_25() {
        let context = ctx()
            .compound(false)
            .current_sets(&[(20.0, 12, Some(7.0)), (20.0, 8, Some(9.0))])
            .build();
        let rec = rule_based_recommendation(&context, 20.0, 8, Some(9.0));
        assert_eq!(rec.weight_kg, 18.75);
        assert!(rec.explanation.contains("reducing load by 1.25 kg."));
    }

    #[test]
    fn test_duration_isolation_30_vs_150() {
        let rec_30 = rule_based_recommendation(&ctx().duration(30).build(), 60.0, 8, Some(6.0));
        let rec_150 = rule_based_recommendation(&ctx().duration(150).build(), 60.0, 8, Some(6.0));
        assert_eq!(rec_30.weight_kg, 62.5);
        assert_eq!(rec_150.weight_kg, 60.0);
    }

    // ── Session trend tests ─────────────────────────────────────────────

    #[test]
    fn test_session_trend_weight_drop_suppresses() {
        let context = ctx()
            .current_sets(&[(62.5, 8, Some(7.0)), (60.0, 8, Some(5.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert!(
            rec.explanation
                .contains("Session trend declining — suppressing increase.")
        );
        assert!(rec.explanation.contains("RPE 5 noted but overridden."));
    }

    #[test]
    fn test_session_trend_stable_no_suppress() {
        let context = ctx()
            .current_sets(&[(60.0, 8, Some(7.0)), (60.0, 8, Some(5.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 62.5);
    }

    #[test]
    fn test_session_trend_needs_low_rpe() {
        // Declining trend but RPE 7 keeps Rule 2's maintain outcome; the
        // trend override only fires under easy sets.
        let context = ctx()
            .current_sets(&[(60.0, 10, Some(7.0)), (60.0, 8, Some(7.0))])
            .build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(7.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert!(!rec.explanation.contains("Session trend"));
    }

    // ── Recent session comparison tests ─────────────────────────────────

    #[test]
    fn test_below_prior_session_best_suppresses() {
        let context = ctx().prior_session(&[(65.0, 6, Some(8.0))]).build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 60.0);
        assert!(
            rec.explanation
                .contains("Current weight below prior session best — suppressing increase.")
        );
    }

    #[test]
    fn test_above_prior_session_best_allows_increase() {
        let context = ctx().prior_session(&[(55.0, 8, Some(7.0))]).build();
        let rec = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 62.5);
    }

    #[test]
    fn test_no_recent_sessions_rule4_skipped() {
        let rec = rule_based_recommendation(&ctx().build(), 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 62.5);
    }

    // ── 1RM cap tests ───────────────────────────────────────────────────

    #[test]
    fn test_1rm_cap_clamps_increase() {
        // 1RM=100 → cap = floor(90/1.25)*1.25 = 90. 90+2.5 exceeds it.
        let rec = rule_based_recommendation(&ctx().one_rm(100.0).build(), 90.0, 5, Some(5.0));
        assert_eq!(rec.weight_kg, 90.0);
        assert_eq!(rec.reps, 5);
        assert!(rec.explanation.contains("Capped at 90% estimated 1RM."));
    }

    #[test]
    fn test_1rm_cap_below_unchanged() {
        let rec = rule_based_recommendation(&ctx().one_rm(100.0).build(), 60.0, 8, Some(5.0));
        assert_eq!(rec.weight_kg, 62.5);
        assert!(!rec.explanation.contains("1RM"));
    }

    #[test]
    fn test_no_1rm_cap_skipped() {
        let rec = rule_based_recommendation(&ctx().build(), 200.0, 5, Some(5.0));
        assert_eq!(rec.weight_kg, 202.5);
        assert!(!rec.explanation.contains("1RM"));
    }

    // ── Output invariants ───────────────────────────────────────────────

    #[test]
    fn test_weight_always_multiple_of_1_25() {
        let contexts = [
            ctx().build(),
            ctx().total_sets(18).build(),
            ctx().duration(130).build(),
            ctx()
                .one_rm(77.7)
                .current_sets(&[(61.3, 11, Some(7.0)), (61.3, 8, Some(9.0))])
                .build(),
        ];
        for context in &contexts {
            for rpe in [None, Some(4.0), Some(6.5), Some(8.0), Some(9.5)] {
                let rec = rule_based_recommendation(context, 61.3, 8, rpe);
                let quarters = rec.weight_kg * 4.0;
                assert!(
                    (quarters - quarters.round()).abs() < 1e-6,
                    "{} is not a 1.25 multiple",
                    rec.weight_kg
                );
                assert!(rec.weight_kg >= 0.0);
            }
        }
    }

    #[test]
    fn test_weight_never_below_zero() {
        let context = ctx()
            .current_sets(&[(1.0, 12, Some(7.0)), (1.0, 8, Some(9.0))])
            .build();
        let rec = rule_based_recommendation(&context, 1.0, 8, Some(9.0));
        assert!(rec.weight_kg >= 0.0);
    }

    #[test]
    fn test_capped_weight_respects_bound() {
        for one_rm in [40.0, 77.7, 100.0, 123.4] {
            let cap = (0.9 * one_rm / 1.25_f64).floor() * 1.25;
            let rec = rule_based_recommendation(&ctx().one_rm(one_rm).build(), 200.0, 5, Some(5.0));
            assert!(rec.weight_kg <= cap + 1e-9);
        }
    }

    #[test]
    fn test_pure_function_same_inputs_same_output() {
        let context = ctx()
            .one_rm(100.0)
            .current_sets(&[(60.0, 10, Some(7.0)), (60.0, 8, Some(5.0))])
            .build();
        let a = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        let b = rule_based_recommendation(&context, 60.0, 8, Some(5.0));
        assert_eq!(a, b);
    }

    // ── Minimal fallback tests ──────────────────────────────────────────

    #[test]
    fn test_minimal_fallback_low_rpe_adds_2_5() {
        for rpe in [Some(6.0), Some(7.0)] {
            let rec = minimal_fallback(60.0, 8, rpe);
            assert_eq!(rec.weight_kg, 62.5);
            assert_eq!(rec.reps, 8);
            assert!(rec.explanation.contains("AI unavailable"));
        }
    }

    #[test]
    fn test_minimal_fallback_high_or_missing_rpe_maintains() {
        for rpe in [Some(8.0), Some(10.0), None] {
            let rec = minimal_fallback(60.0, 8, rpe);
            assert_eq!(rec.weight_kg, 60.0);
            assert_eq!(rec.reps, 8);
        }
    }
}
