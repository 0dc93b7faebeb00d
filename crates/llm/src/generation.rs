use std::sync::Arc;

use serde::{Deserialize, Serialize};
use study_core::{Difficulty, QuizData};
use tracing::{error, info};

use crate::fence;
use crate::prompts;
use crate::provider::{LlmError, LlmProvider};

/// Default number of key points requested.
pub const DEFAULT_MAX_KEY_POINTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Study-material operations on top of a text generation provider.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn LlmProvider>,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn summarize(&self, content: &str) -> Result<String, LlmError> {
        info!("Generating summary ({} chars)", content.len());
        self.call("summary", &prompts::summary(content)).await
    }

    pub async fn generate_quiz(
        &self,
        content: &str,
        question_count: u32,
        difficulty: Difficulty,
    ) -> Result<QuizData, LlmError> {
        info!(
            "Generating {} quiz with {} questions ({} chars)",
            difficulty,
            question_count,
            content.len()
        );
        let raw = self
            .call("quiz", &prompts::quiz(content, question_count, difficulty))
            .await?;
        fence::parse_quiz(&raw).map_err(|e| {
            error!("Quiz response failed validation: {}", e);
            LlmError::from(e)
        })
    }

    pub async fn explain(&self, topic: &str, context: Option<&str>) -> Result<String, LlmError> {
        let context = context.map(str::trim).filter(|c| !c.is_empty());
        info!("Generating explanation for '{}' (context: {})", topic, context.is_some());
        self.call("explanation", &prompts::explanation(topic, context))
            .await
    }

    pub async fn extract_key_points(
        &self,
        text: &str,
        max_points: usize,
    ) -> Result<Vec<String>, LlmError> {
        info!("Extracting up to {} key points", max_points);
        let raw = self
            .call("key points", &prompts::key_points(text, max_points))
            .await?;
        Ok(split_key_points(&raw, max_points))
    }

    pub async fn categorize(&self, text: &str) -> Result<Categories, LlmError> {
        info!("Categorizing content ({} chars)", text.len());
        let raw = self.call("categories", &prompts::categories(text)).await?;
        fence::parse_json(&raw).map_err(|e| {
            error!("Categories response failed validation: {}", e);
            LlmError::from(e)
        })
    }

    async fn call(&self, kind: &str, prompt: &str) -> Result<String, LlmError> {
        match self.provider.generate(prompt).await {
            Ok(text) if text.trim().is_empty() => {
                error!("Error generating {}: empty result", kind);
                Err(LlmError::EmptyResult)
            }
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Error generating {}: {}", kind, e);
                Err(e)
            }
        }
    }
}

/// One point per non-blank line, list markers removed.
fn split_key_points(raw: &str, max_points: usize) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_list_marker)
        .filter(|point| !point.is_empty())
        .map(str::to_string)
        .take(max_points)
        .collect()
}

/// Strips a leading run of digits, `-`, `*` or `•`, an optional `.` or `)`,
/// and the whitespace after it.
fn strip_list_marker(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '-' | '*' | '•'));
    if rest.len() == line.len() {
        return line;
    }
    let rest = rest
        .strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .unwrap_or(rest);
    rest.trim_start()
}
