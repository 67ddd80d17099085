//! Prompt construction for set recommendations. Rendering order is fixed and
//! the output is a pure function of the context, so regression tests can pin
//! exact prompt strings.

use crate::ai::context::{SessionSummary, SessionSet, WorkoutContext};

pub const SYSTEM_PROMPT: &str = "You are an expert strength coach specializing in strength and hypertrophy training. \
Your job is to recommend the NEXT SET ONLY (weight in kg and number of reps) \
based on the athlete's context: exercise, current session sets, recent session history, \
estimated 1RM, personal best, and fatigue signals (total sets today, workout duration).\n\n\
CRITICAL OUTPUT RULES:\n\
- You must respond with ONLY valid JSON.\n\
- Do NOT include markdown, code fences, or explanatory text outside the JSON.\n\
- Your entire response must be exactly one JSON object matching the requested schema.\n\
- Do NOT recommend multiple sets.\n\
- Do NOT recommend a full workout.\n\n\
WEIGHT AND REP CONSTRAINTS:\n\
- All weights must be in kilograms (kg).\n\
- All rep counts must be integers.\n\
- Weight must be a realistic gym load.\n\
- Only use increments of 1.25 kg.\n\
- Never suggest impossible weights like 83.7 kg.\n\n\
COACHING GUIDELINES:\n\
- Base recommendations on the athlete's demonstrated strength and fatigue.\n\
- Prefer conservative progression when fatigue is high.\n\
- Do not increase weight aggressively if recent sets were near failure.\n";

/// Render a kg value without noise: whole numbers bare, 1.25-multiples with
/// the decimals they need.
fn format_kg(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else if (value * 10.0).fract().abs() < f64::EPSILON {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

fn format_current_sets(sets: &[SessionSet]) -> String {
    sets.iter()
        .map(|s| {
            let rpe = s
                .rpe
                .map(|r| format!(" RPE {}", format_kg(r)))
                .unwrap_or_default();
            format!(
                "  Set {}: {} kg x {} reps{}",
                s.set_number,
                format_kg(s.weight_kg),
                s.reps,
                rpe
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_session_history(sessions: &[SessionSummary]) -> String {
    sessions
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let sets = session
                .sets
                .iter()
                .map(|s| {
                    let rpe = s
                        .rpe
                        .map(|r| format!(" RPE {}", format_kg(r)))
                        .unwrap_or_default();
                    format!("{} kg x {} reps{}", format_kg(s.weight_kg), s.reps, rpe)
                })
                .collect::<Vec<_>>()
                .join("; ");
            format!("  Session {}: date={} {}", i + 1, session.date, sets)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user prompt for a single set recommendation.
pub fn build_recommendation_prompt(ctx: &WorkoutContext) -> String {
    let mut lines: Vec<String> = vec![
        "Recommend the next set for this exercise.".to_string(),
        String::new(),
        "--- Exercise ---".to_string(),
        format!("Exercise: {}", ctx.exercise_name),
        format!("Muscle group: {}", ctx.muscle_group),
        format!("Equipment: {}", ctx.equipment_type),
        format!("Compound movement: {}", ctx.is_compound),
        String::new(),
    ];

    match ctx.estimated_1rm {
        Some(one_rm) => lines.push(format!("Estimated 1RM: {} kg", format_kg(one_rm))),
        None => lines.push("Estimated 1RM: not available".to_string()),
    }
    match ctx.max_weight_ever {
        Some(best) => lines.push(format!(
            "Personal best (max weight ever): {} kg",
            format_kg(best)
        )),
        None => lines.push("Personal best: not available".to_string()),
    }
    lines.push(String::new());

    lines.push("--- Current session sets (this exercise) ---".to_string());
    if ctx.current_session_sets.is_empty() {
        lines.push("No sets completed yet this session.".to_string());
    } else {
        lines.push(format_current_sets(&ctx.current_session_sets));
    }
    lines.push(String::new());

    lines.push("--- Recent session history (last 3 sessions for this exercise) ---".to_string());
    if ctx.recent_sessions.is_empty() {
        lines.push("No recent session data.".to_string());
    } else {
        lines.push(format_session_history(&ctx.recent_sessions));
    }
    lines.push(String::new());

    lines.push("--- Fatigue / workload today ---".to_string());
    lines.push(format!(
        "Total sets completed today (all exercises): {}",
        ctx.total_sets_today
    ));
    lines.push(format!(
        "Workout duration so far: {} minutes",
        ctx.workout_duration_minutes
    ));
    lines.push(String::new());

    lines.push(
        "Respond with ONLY a JSON object with exactly these keys (no other keys, no extra text):"
            .to_string(),
    );
    lines.push("  \"suggested_weight_kg\": <number in kg, e.g. 82.5>,".to_string());
    lines.push("  \"suggested_reps\": <integer number of reps>,".to_string());
    lines.push("  \"explanation\": \"<short reason for this recommendation>\",".to_string());
    lines.push("  \"confidence\": \"<one of: high | medium | low>\"".to_string());

    lines.join("\n")
}
