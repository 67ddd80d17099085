use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub secret_key: String,
    pub jwt_algorithm: String,
    pub access_token_expire_minutes: i64,
    pub ai_provider: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub allowed_origins: String,
    pub environment: String,
    pub port: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()?;
        let secret_key = env::var("SECRET_KEY")?;
        let jwt_algorithm = env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?;
        let ai_provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
        let gemini_api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());

        Ok(Self {
            database_url,
            db_max_connections,
            secret_key,
            jwt_algorithm,
            access_token_expire_minutes,
            ai_provider,
            gemini_api_key,
            gemini_model,
            allowed_origins,
            environment,
            port,
        })
    }
}
