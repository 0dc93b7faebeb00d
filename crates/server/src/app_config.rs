//! Application configuration builders.
//!
//! Constructs the generation client and the shared state from `Config`.

use std::sync::Arc;

use study_llm::GenerationClient;
use tracing::info;

use crate::db;
use crate::state::AppState;

/// Load configuration from `.env` and environment variables.
pub fn load_config() -> study_core::Config {
    study_core::config::load_dotenv();
    study_core::Config::from_env()
}

/// Build the generation client. A missing API key only logs a warning; calls
/// then fail with a configuration error.
pub fn build_generation_client(config: &study_core::Config) -> anyhow::Result<GenerationClient> {
    let provider = study_llm::create_provider(&config.generation)?;
    info!("Generation client ready (model: {})", config.generation.model);
    Ok(GenerationClient::new(provider))
}

/// Everything the router needs: generation client, store, empty sessions.
pub async fn build_state(config: study_core::Config) -> anyhow::Result<Arc<AppState>> {
    let generation = build_generation_client(&config)?;
    let store = db::init_store(&config.database).await;
    info!("Document store backend: {}", store.backend().name());
    Ok(Arc::new(AppState::new(config, generation, store)))
}
