use std::time::Instant;

use gemini_rust::{Gemini, GenerationConfig};
use serde_json::Value;

use crate::ai::context::WorkoutContext;
use crate::ai::prompt;
use crate::ai::{AiError, AiRecommendation, Confidence};

/// Gemini-backed provider. The client is constructed per request; a missing
/// or blank API key fails as `ProviderUnavailable` before any network I/O.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }

    fn client(&self) -> Result<Gemini, AiError> {
        if self.api_key.trim().is_empty() {
            return Err(AiError::ProviderUnavailable(
                "Gemini API key not configured".to_string(),
            ));
        }
        let model = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        Gemini::with_model(self.api_key.clone(), model)
            .map_err(|e| AiError::ProviderUnavailable(e.to_string()))
    }

    pub async fn recommend(&self, ctx: &WorkoutContext) -> Result<AiRecommendation, AiError> {
        let client = self.client()?;
        let user_prompt = prompt::build_recommendation_prompt(ctx);

        let start = Instant::now();
        let response = client
            .generate_content()
            .with_system_prompt(prompt::SYSTEM_PROMPT)
            .with_user_message(user_prompt.as_str())
            .with_generation_config(GenerationConfig {
                temperature: Some(0.3),
                max_output_tokens: Some(512),
                response_mime_type: Some("application/json".to_string()),
                ..Default::default()
            })
            .execute()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;
        let latency_ms = start.elapsed().as_millis() as i32;

        let raw = response.text();
        if raw.trim().is_empty() {
            return Err(AiError::InvalidResponse(
                "Gemini returned empty response".to_string(),
            ));
        }

        tracing::debug!(latency_ms, response = %raw, "gemini.response");
        parse_recommendation(&raw, &self.model, latency_ms)
    }

    pub async fn health_check(&self) -> bool {
        let Ok(client) = self.client() else {
            return false;
        };
        client
            .generate_content()
            .with_user_message("Reply with OK.")
            .execute()
            .await
            .is_ok()
    }
}

/// Validate a raw model response into a recommendation. The body must be one
/// JSON object carrying `suggested_weight_kg` (number), `suggested_reps`
/// (integer), `explanation` (non-empty string), and `confidence`
/// (high|medium|low); anything else is an invalid response.
pub fn parse_recommendation(
    raw: &str,
    model: &str,
    latency_ms: i32,
) -> Result<AiRecommendation, AiError> {
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| AiError::InvalidResponse(format!("response is not valid JSON: {e}")))?;

    let suggested_weight_kg = data
        .get("suggested_weight_kg")
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            AiError::InvalidResponse("invalid suggested_weight_kg: expected number".to_string())
        })?;

    let suggested_reps = data
        .get("suggested_reps")
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            AiError::InvalidResponse("invalid suggested_reps: expected integer".to_string())
        })?;

    let explanation = data
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AiError::InvalidResponse("invalid explanation: expected non-empty string".to_string())
        })?;

    let confidence = data
        .get("confidence")
        .and_then(Value::as_str)
        .and_then(Confidence::parse)
        .ok_or_else(|| {
            AiError::InvalidResponse(
                "invalid confidence: expected one of high, medium, low".to_string(),
            )
        })?;

    Ok(AiRecommendation {
        suggested_weight_kg,
        suggested_reps: suggested_reps as i32,
        explanation: explanation.to_string(),
        confidence,
        raw_response: raw.to_string(),
        latency_ms,
        model_used: model.to_string(),
    })
}
