pub mod auth;
pub mod exercises;
pub mod health;
pub mod sets;
pub mod users;
pub mod workouts;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{FromRequestParts, Request};
use axum::http::HeaderValue;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::ai::AiProvider;
use crate::config::Config;
use crate::db::models::User;
use crate::db::repos;
use crate::error::AppError;
use crate::security;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub ai: Arc<AiProvider>,
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
/// The token subject must resolve to an existing user.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        fn rejection() -> AppError {
            AppError::Unauthorized("Could not validate credentials")
        }

        let Some(token) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
        else {
            return Err(rejection());
        };

        let Some(user_id) = security::decode_token(token, &state.config) else {
            return Err(rejection());
        };

        let user = repos::users::get(&state.pool, user_id).await?;
        user.map(CurrentUser).ok_or_else(rejection)
    }
}

/// CORS allow-list from configuration. A wildcard is only honoured in
/// development; in any other environment it is stripped with a warning.
fn allowed_origins(config: &Config) -> Vec<String> {
    let origins: Vec<String> = config
        .allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if config.environment == "development" {
        return origins;
    }
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("ALLOWED_ORIGINS contains '*' outside development; wildcard dropped");
        return origins.into_iter().filter(|o| o != "*").collect();
    }
    origins
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = allowed_origins(config);
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        ))
    }
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "http.request"
    );
    response
}

pub fn router(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::me))
        .route("/users/me/stats", get(users::my_overview_stats))
        .route("/users/me/stats/{exercise_id}", get(users::my_exercise_stats))
        .route("/workouts", post(workouts::start_workout).get(workouts::list_workouts))
        .route(
            "/workouts/{workout_id}",
            get(workouts::get_workout).patch(workouts::update_workout),
        )
        .route("/workouts/{workout_id}/end", post(workouts::end_workout))
        .route(
            "/workouts/{workout_id}/sets",
            post(sets::log_set).get(sets::list_sets),
        )
        .route("/sets/{set_id}", delete(sets::delete_set))
        .route(
            "/exercises",
            get(exercises::list_exercises).post(exercises::create_exercise),
        )
        .route("/exercises/{exercise_id}", get(exercises::get_exercise));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api_v1)
        .layer(middleware::from_fn(log_requests))
        .layer(cors_layer(&state.config))
        .with_state(state)
}
