pub mod auth_service;
pub mod exercise_service;
pub mod rule_engine;
pub mod set_service;
pub mod stats_service;
pub mod workout_service;
