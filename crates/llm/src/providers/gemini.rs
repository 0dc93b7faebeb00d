use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use study_core::config::GenerationConfig;
use tracing::{debug, error};

use crate::provider::{LlmError, LlmProvider};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(config: &GenerationConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }

    /// Build the request body for the Gemini generateContent API.
    fn build_request_body(prompt: &str) -> Value {
        json!({
            "contents": [
                { "parts": [{ "text": prompt }] }
            ],
        })
    }

    /// `candidates[0].content.parts[0].text`, or "" when any level is missing.
    fn extract_text(resp: &Value) -> String {
        resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::NotConfigured("GEMINI_API_KEY not set".into())
        })?;

        let body = Self::build_request_body(prompt);

        debug!("Gemini request to model={} ({} prompt chars)", self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint(api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error: {} - {}", status.as_u16(), body);
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let resp: Value = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.without_url().to_string()))?;

        Ok(Self::extract_text(&resp))
    }
}
