//! Narrow typed accessors over the persistent entities. Every function takes
//! a sqlx executor so reads and writes participate in the caller's
//! transaction; a set inserted earlier in the same transaction is visible to
//! the context builder within the same request.

pub mod exercises;
pub mod recommendations;
pub mod sets;
pub mod users;
pub mod workouts;
