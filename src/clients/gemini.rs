pub mod models;

pub use models::GeminiModel;

use crate::config::{optional_var, KeyFromEnv};
use crate::core::{GenerationParams, LowLevelClient};
use crate::error::{AIError, ConfigError, GeminiError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent>,
    generation_config: &'a GenerationParams,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Configuration for Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: GeminiModel,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: GeminiModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Build a configuration from `GOOGLE_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = GeminiClient::require_key()?;
        let model = optional_var("GEMINI_MODEL")
            .map(|name| GeminiModel::from_name(&name))
            .unwrap_or_default();
        let base_url = optional_var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self { api_key, model, base_url })
    }

    #[must_use]
    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.id()
        )
    }
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl KeyFromEnv for GeminiClient {
    const KEY_NAME: &'static str = "GOOGLE_API_KEY";
}

impl GeminiClient {
    /// Create a new Gemini client with full configuration
    pub fn new(config: GeminiConfig) -> Self {
        info!(model = %config.model, "Creating new Gemini client");
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        GeminiConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

/// Classify a non-success HTTP reply.
fn classify_failure(status: u16, body: &str) -> GeminiError {
    let envelope = serde_json::from_str::<GeminiErrorEnvelope>(body).ok();
    let api_status = envelope.as_ref().map(|e| e.error.status.as_str()).unwrap_or("");

    if status == 429 || api_status == "RESOURCE_EXHAUSTED" {
        return GeminiError::RateLimit;
    }
    if status == 401 || status == 403 || api_status == "UNAUTHENTICATED" {
        return GeminiError::Authentication;
    }
    let message = envelope
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());
    GeminiError::Api(format!("{} ({})", message, status))
}

/// Pull the text payload out of a successful reply, or the reason there is none.
fn extract_text(response: GeminiResponse) -> Result<String, GeminiError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GeminiError::Blocked(block_reason.unwrap_or_else(|| "Unknown".to_string())));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        let reason = block_reason
            .or(candidate.finish_reason)
            .unwrap_or_else(|| "Unknown".to_string());
        return Err(GeminiError::Blocked(reason));
    }
    Ok(text)
}

#[async_trait]
impl LowLevelClient for GeminiClient {
    #[instrument(skip(self, prompt, params), fields(prompt_len = prompt.len(), model = %self.config.model))]
    async fn ask_raw(&self, prompt: String, params: &GenerationParams) -> Result<String, AIError> {
        debug!(model = %self.config.model, prompt_len = prompt.len(), "Preparing Gemini API request");

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: Some(prompt) }],
            }],
            generation_config: params,
        };

        debug!("Sending request to Gemini API");
        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                AIError::Gemini(GeminiError::Http(e.to_string()))
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from Gemini API");

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let failure = classify_failure(status.as_u16(), &error_text);
            match &failure {
                GeminiError::RateLimit => warn!("Gemini API rate limit exceeded"),
                GeminiError::Authentication => error!("Gemini API authentication failed"),
                _ => error!(status = %status, error = %error_text, "Gemini API error"),
            }
            return Err(failure.into());
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to parse Gemini response JSON");
                AIError::Gemini(GeminiError::Http(e.to_string()))
            })?;

        debug!(candidates_count = gemini_response.candidates.len(), "Parsed Gemini response");

        let result = extract_text(gemini_response);
        match &result {
            Ok(text) => info!(response_len = text.len(), "Successfully received Gemini response"),
            Err(e) => warn!(error = %e, "Gemini returned no usable content"),
        }

        result.map_err(AIError::from)
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GeminiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_body_matches_generate_content_shape() {
        let params = GenerationParams::default();
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: Some("hello".to_string()) }],
            }],
            generation_config: &params,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1500);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn endpoint_uses_model_id() {
        let config = GeminiConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..GeminiConfig::default()
        }
        .with_model(GeminiModel::Flash25);
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn text_parts_are_concatenated() {
        let response = parse(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"mcqs\":" }, { "text": "[]}" }] },
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(extract_text(response).unwrap(), "{\"mcqs\":[]}");
    }

    #[test]
    fn prompt_block_reports_feedback_reason() {
        let response = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        match extract_text(response) {
            Err(GeminiError::Blocked(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[test]
    fn empty_candidate_falls_back_to_finish_reason() {
        let response = parse(json!({ "candidates": [{ "finishReason": "RECITATION" }] }));
        match extract_text(response) {
            Err(GeminiError::Blocked(reason)) => assert_eq!(reason, "RECITATION"),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[test]
    fn no_candidates_and_no_feedback_is_unknown() {
        match extract_text(GeminiResponse::default()) {
            Err(GeminiError::Blocked(reason)) => assert_eq!(reason, "Unknown"),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[test]
    fn quota_errors_are_rate_limits() {
        let body = json!({ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } });
        assert!(matches!(classify_failure(429, &body.to_string()), GeminiError::RateLimit));
        assert!(matches!(classify_failure(400, &body.to_string()), GeminiError::RateLimit));
    }

    #[test]
    fn other_failures_keep_the_service_message() {
        let body = json!({ "error": { "code": 500, "message": "Internal error", "status": "INTERNAL" } });
        match classify_failure(500, &body.to_string()) {
            GeminiError::Api(message) => assert_eq!(message, "Internal error (500)"),
            other => panic!("expected Api, got {:?}", other),
        }
        assert!(matches!(classify_failure(403, "forbidden"), GeminiError::Authentication));
    }
}
