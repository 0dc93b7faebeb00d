use async_trait::async_trait;

use crate::fence::ValidationError;

/// Trait for text generation backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the generated text. An empty string means
    /// the response carried no text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(reqwest::Error),
    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("generation returned an empty result")]
    EmptyResult,
    #[error("invalid generated content: {0}")]
    Validation(#[from] ValidationError),
}

/// Upstream body text shown to users is cut to this many chars.
pub const MAX_BODY_IN_MESSAGE: usize = 300;

// Request URLs carry the API key as a query parameter; never keep them.
impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::HttpError(e.without_url())
    }
}

impl LlmError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::HttpError(e) if e.is_timeout())
    }

    /// Upstream HTTP status, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            LlmError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message for an end user. API errors carry the status and a bounded
    /// excerpt of the upstream body.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::NotConfigured(_) => {
                "The AI service is not configured. Please set GEMINI_API_KEY.".to_string()
            }
            LlmError::ApiError { status, body } => {
                let excerpt = body_excerpt(body);
                if excerpt.is_empty() {
                    format!("The AI service returned an error (status {status}).")
                } else {
                    format!("The AI service returned an error (status {status}): {excerpt}")
                }
            }
            LlmError::HttpError(e) if e.is_timeout() => {
                "The AI service took too long to respond. Please try again.".to_string()
            }
            LlmError::HttpError(_) => {
                "Could not reach the AI service. Please try again.".to_string()
            }
            LlmError::ParseError(_) => {
                "The AI service sent a response that could not be read.".to_string()
            }
            LlmError::EmptyResult => "The AI service returned an empty result.".to_string(),
            LlmError::Validation(e) => format!("The generated content was invalid: {e}"),
        }
    }
}

/// Whitespace-collapsed body, truncated to `MAX_BODY_IN_MESSAGE` chars.
fn body_excerpt(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_BODY_IN_MESSAGE {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(MAX_BODY_IN_MESSAGE).collect();
    cut.push_str("...");
    cut
}
