use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use liftcoach::ai::AiProvider;
use liftcoach::api::{self, AppState};
use liftcoach::config::Config;
use liftcoach::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::connect(&config).await?;
    sqlx::migrate!().run(&pool).await?;

    // Unknown provider names fail here, before the server binds.
    let ai = Arc::new(AiProvider::from_config(&config)?);

    tracing::info!(
        environment = %config.environment,
        ai_provider = %config.ai_provider,
        "server.starting"
    );

    let state = AppState {
        config: config.clone(),
        pool,
        ai,
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = %config.port, "server.listening");
    axum::serve(listener, app).await?;

    Ok(())
}
