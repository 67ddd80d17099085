//! Seed the canonical 20 global exercises.
//!
//! Run against the same database as the API (DATABASE_URL, migrations
//! applied). Idempotent: skips when 10 or more global exercises exist.

use liftcoach::config::Config;
use liftcoach::db;
use liftcoach::db::repos::exercises;

const MIN_SEED_COUNT: i64 = 10;

// (name, muscle_group, equipment_type, is_compound)
const SEED_EXERCISES: [(&str, &str, &str, bool); 20] = [
    ("Bench Press", "Chest", "Barbell", true),
    ("Incline Bench Press", "Chest", "Barbell", true),
    ("Squat", "Legs", "Barbell", true),
    ("Front Squat", "Legs", "Barbell", true),
    ("Deadlift", "Back", "Barbell", true),
    ("Romanian Deadlift", "Hamstrings", "Barbell", true),
    ("Overhead Press", "Shoulders", "Barbell", true),
    ("Barbell Row", "Back", "Barbell", true),
    ("Pull-up", "Back", "Bodyweight", true),
    ("Chin-up", "Back", "Bodyweight", true),
    ("Dip", "Chest", "Bodyweight", true),
    ("Leg Press", "Legs", "Machine", true),
    ("Hip Thrust", "Glutes", "Barbell", true),
    ("Lunge", "Legs", "Dumbbell", true),
    ("Dumbbell Bench Press", "Chest", "Dumbbell", true),
    ("Dumbbell Curl", "Biceps", "Dumbbell", false),
    ("Tricep Pushdown", "Triceps", "Cable", false),
    ("Lateral Raise", "Shoulders", "Dumbbell", false),
    ("Cable Fly", "Chest", "Cable", false),
    ("Leg Curl", "Hamstrings", "Machine", false),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;

    let existing = exercises::count_global(&pool).await?;
    if existing >= MIN_SEED_COUNT {
        println!("Already seeded ({existing} global exercises). Skip.");
        return Ok(());
    }

    for (name, muscle_group, equipment_type, is_compound) in SEED_EXERCISES {
        exercises::create(&pool, name, muscle_group, Some(equipment_type), is_compound).await?;
    }
    println!("Seeded {} global exercises.", SEED_EXERCISES.len());

    Ok(())
}
