pub mod context;
pub mod gemini;
pub mod prompt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::context::WorkoutContext;
use crate::ai::gemini::GeminiProvider;
use crate::config::Config;

/// Errors from the AI layer. All of them mean the same thing to the set
/// logger: fall back to the rule engine.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider not configured: {0}")]
    ProviderUnavailable(String),

    #[error("invalid AI response: {0}")]
    InvalidResponse(String),

    #[error("AI request failed: {0}")]
    Request(String),

    #[error("AI request timed out")]
    Timeout,

    #[error("{0} provider not implemented")]
    NotImplemented(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

/// Structured recommendation returned by an AI provider.
#[derive(Debug, Clone)]
pub struct AiRecommendation {
    pub suggested_weight_kg: f64,
    pub suggested_reps: i32,
    pub explanation: String,
    pub confidence: Confidence,
    pub raw_response: String,
    pub latency_ms: i32,
    pub model_used: String,
}

/// AI provider capability: {recommend, health_check}. One variant is selected
/// by `AI_PROVIDER` at startup and cached in the app state for the process
/// lifetime; unknown names fail fast.
pub enum AiProvider {
    Gemini(GeminiProvider),
    OpenAi,
    Ollama,
}

impl AiProvider {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.ai_provider.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini(GeminiProvider::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            ))),
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => anyhow::bail!(
                "unknown AI_PROVIDER {other:?}; use one of: gemini, openai, ollama"
            ),
        }
    }

    pub async fn recommend(&self, ctx: &WorkoutContext) -> Result<AiRecommendation, AiError> {
        match self {
            Self::Gemini(provider) => provider.recommend(ctx).await,
            Self::OpenAi => Err(AiError::NotImplemented("openai")),
            Self::Ollama => Err(AiError::NotImplemented("ollama")),
        }
    }

    pub async fn health_check(&self) -> bool {
        match self {
            Self::Gemini(provider) => provider.health_check().await,
            Self::OpenAi | Self::Ollama => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_parse_rejects_unknown() {
        assert_eq!(Confidence::parse("high"), Some(Confidence::High));
        assert_eq!(Confidence::parse("medium"), Some(Confidence::Medium));
        assert_eq!(Confidence::parse("low"), Some(Confidence::Low));
        assert_eq!(Confidence::parse("HIGH"), None);
        assert_eq!(Confidence::parse("certain"), None);
    }

    fn config_with_provider(name: &str) -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            db_max_connections: 1,
            secret_key: "test-secret".to_string(),
            jwt_algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            ai_provider: name.to_string(),
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.0-flash".to_string(),
            allowed_origins: String::new(),
            environment: "development".to_string(),
            port: "8000".to_string(),
        }
    }

    #[test]
    fn test_provider_selection_unknown_name_fails() {
        assert!(AiProvider::from_config(&config_with_provider("bard")).is_err());
        assert!(AiProvider::from_config(&config_with_provider("gemini")).is_ok());
        assert!(AiProvider::from_config(&config_with_provider("openai")).is_ok());
        assert!(AiProvider::from_config(&config_with_provider("ollama")).is_ok());
    }

    #[tokio::test]
    async fn test_stub_providers_fail_not_implemented() {
        let ctx = crate::ai::context::WorkoutContext {
            exercise_name: "Bench Press".to_string(),
            muscle_group: "Chest".to_string(),
            equipment_type: "Barbell".to_string(),
            is_compound: true,
            current_session_sets: vec![],
            recent_sessions: vec![],
            estimated_1rm: None,
            max_weight_ever: None,
            total_sets_today: 0,
            workout_duration_minutes: 0,
        };
        let provider = AiProvider::from_config(&config_with_provider("openai")).unwrap();
        assert!(matches!(
            provider.recommend(&ctx).await,
            Err(AiError::NotImplemented("openai"))
        ));
        assert!(!provider.health_check().await);
    }
}
