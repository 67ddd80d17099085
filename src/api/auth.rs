use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::users::UserResponse;
use crate::error::AppError;
use crate::services::auth_service;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    if body.email.trim().is_empty() || body.username.trim().is_empty() {
        return Err(AppError::Validation(
            "email and username must not be empty".to_string(),
        ));
    }
    if body.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".to_string()));
    }
    let user = auth_service::register(&state.pool, &body.email, &body.username, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let access_token =
        auth_service::login(&state.pool, &state.config, &body.email, &body.password).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
