use study_core::Config;
use study_llm::GenerationClient;
use study_storage::DocumentStore;

use crate::session::SessionStore;

/// Process-wide state, built once at startup.
pub struct AppState {
    pub config: Config,
    pub generation: GenerationClient,
    pub store: DocumentStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, generation: GenerationClient, store: DocumentStore) -> Self {
        Self {
            config,
            generation,
            store,
            sessions: SessionStore::new(),
        }
    }
}
