pub mod gemini;

use std::sync::Arc;

use study_core::config::GenerationConfig;
use tracing::warn;

use crate::provider::{LlmError, LlmProvider};

/// Create the generation provider from config.
///
/// A missing API key is not fatal here: the provider is still built and each
/// call reports `NotConfigured`.
pub fn create_provider(config: &GenerationConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    if !config.is_configured() {
        warn!("GEMINI_API_KEY not set, generation requests will fail");
    }
    Ok(Arc::new(gemini::GeminiProvider::new(config)?))
}
