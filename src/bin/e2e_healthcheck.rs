//! One-time end-to-end smoke check against a running server:
//! register -> login -> pick exercise -> start workout -> log sets
//! (working + warmup) -> end workout.
//!
//! BASE_URL overrides the default http://127.0.0.1:8000.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, bail};
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base = std::env::var("BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let api = format!("{base}/api/v1");
    let http = reqwest::Client::new();

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let email = format!("e2e_{ts}@liftcoach-healthcheck.local");
    let username = format!("e2euser_{ts}");
    let password = "HealthCheck2025!";

    println!("=== REGISTER ===");
    let resp = http
        .post(format!("{api}/auth/register"))
        .json(&json!({ "email": email, "username": username, "password": password }))
        .send()
        .await?;
    let status = resp.status();
    let body: Value = resp.json().await?;
    println!("Status: {status}\n{body:#}");
    if status.as_u16() != 201 {
        bail!("register failed");
    }

    println!("\n=== LOGIN ===");
    let resp = http
        .post(format!("{api}/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    let status = resp.status();
    let body: Value = resp.json().await?;
    println!("Status: {status}");
    if status.as_u16() != 200 {
        bail!("login failed");
    }
    let token = body["access_token"]
        .as_str()
        .context("missing access_token")?
        .to_string();

    println!("\n=== EXERCISES ===");
    let resp = http
        .get(format!("{api}/exercises"))
        .bearer_auth(&token)
        .send()
        .await?;
    let exercises: Vec<Value> = resp.json().await?;
    let exercise = exercises
        .iter()
        .find(|e| e["is_compound"].as_bool().unwrap_or(false))
        .or_else(|| exercises.first())
        .context("no exercises found; run seed_exercises first")?;
    let exercise_id = exercise["id"].as_str().context("missing exercise id")?;
    println!("Picked: {} ({})", exercise["name"], exercise_id);

    println!("\n=== START WORKOUT ===");
    let resp = http
        .post(format!("{api}/workouts"))
        .bearer_auth(&token)
        .json(&json!({ "name": "E2E Health Check Workout" }))
        .send()
        .await?;
    let status = resp.status();
    let workout: Value = resp.json().await?;
    println!("Status: {status}");
    if status.as_u16() != 201 {
        bail!("start workout failed");
    }
    let workout_id = workout["id"].as_str().context("missing workout id")?;

    for (label, set) in [
        (
            "SET 1 (80kg x 5 RPE 7)",
            json!({ "exercise_id": exercise_id, "weight_kg": 80, "reps": 5, "rpe": 7, "is_warmup": false }),
        ),
        (
            "SET 2 (82.5kg x 5 RPE 8)",
            json!({ "exercise_id": exercise_id, "weight_kg": 82.5, "reps": 5, "rpe": 8, "is_warmup": false }),
        ),
        (
            "SET 3 (warmup)",
            json!({ "exercise_id": exercise_id, "weight_kg": 60, "reps": 10, "rpe": null, "is_warmup": true }),
        ),
    ] {
        println!("\n=== {label} ===");
        let resp = http
            .post(format!("{api}/workouts/{workout_id}/sets"))
            .bearer_auth(&token)
            .json(&set)
            .send()
            .await?;
        let status = resp.status();
        let body: Value = resp.json().await?;
        println!("Status: {status}");
        if status.as_u16() != 201 {
            bail!("log set failed: {body:#}");
        }
        match &body["recommendation"] {
            Value::Null => println!("  recommendation: null (warmup)"),
            rec => println!(
                "  model_used: {}  suggested: {} kg x {} reps  latency_ms: {}",
                rec["model_used"], rec["suggested_weight_kg"], rec["suggested_reps"],
                rec["latency_ms"]
            ),
        }
    }

    println!("\n=== END WORKOUT ===");
    let resp = http
        .post(format!("{api}/workouts/{workout_id}/end"))
        .bearer_auth(&token)
        .send()
        .await?;
    let status = resp.status();
    let workout: Value = resp.json().await?;
    println!("Status: {status}");
    if status.as_u16() != 200 {
        bail!("end workout failed");
    }
    println!("ended_at populated: {}", !workout["ended_at"].is_null());

    println!("\nAll checks passed.");
    Ok(())
}
