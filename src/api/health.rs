use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::api::AppState;
use crate::db;

/// Unified health check over DB and AI. 200 when both are ok, 503 otherwise.
/// No authentication.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = match db::ping(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "health.db_failed");
            false
        }
    };

    let ai_ok = state.ai.health_check().await;
    if !ai_ok {
        tracing::warn!("health.ai_failed");
    }

    let overall_ok = db_ok && ai_ok;
    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if overall_ok { "ok" } else { "degraded" },
            "db": if db_ok { "ok" } else { "error" },
            "ai": if ai_ok { "ok" } else { "error" },
        })),
    )
}
