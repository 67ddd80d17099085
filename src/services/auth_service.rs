use sqlx::PgPool;

use crate::config::Config;
use crate::db::models::User;
use crate::db::repos::users;
use crate::error::AppError;
use crate::security;

/// Register a new user; email and username must both be unused.
pub async fn register(
    pool: &PgPool,
    email: &str,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    if users::get_by_email(pool, email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if users::get_by_username(pool, username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let hashed_pw = security::hash_password(password)?;
    Ok(users::create(pool, email, username, &hashed_pw).await?)
}

/// Authenticate and mint an access token with `sub` = user id.
pub async fn login(
    pool: &PgPool,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<String, AppError> {
    let user = users::get_by_email(pool, email)
        .await?
        .ok_or(AppError::Unauthorized("Invalid email or password"))?;

    if !security::verify_password(password, &user.hashed_pw) {
        return Err(AppError::Unauthorized("Invalid email or password"));
    }

    Ok(security::create_access_token(user.id, config)?)
}
