use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::User;

pub async fn create(
    conn: impl PgExecutor<'_>,
    email: &str,
    username: &str,
    hashed_pw: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, username, hashed_pw)
        VALUES ($1, $2, $3)
        RETURNING id, email, username, hashed_pw, created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(hashed_pw)
    .fetch_one(conn)
    .await
}

pub async fn get(conn: impl PgExecutor<'_>, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, username, hashed_pw, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn get_by_email(
    conn: impl PgExecutor<'_>,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, username, hashed_pw, created_at, updated_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(conn)
    .await
}

pub async fn get_by_username(
    conn: impl PgExecutor<'_>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, username, hashed_pw, created_at, updated_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(conn)
    .await
}
