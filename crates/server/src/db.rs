use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use study_core::config::DatabaseConfig;
use study_storage::DocumentStore;
use tracing::{info, warn};

/// Connect the document store and run migrations.
/// Falls back to the offline store when no database is configured or reachable.
pub async fn init_store(config: &DatabaseConfig) -> DocumentStore {
    let Some(url) = config.url.as_deref() else {
        warn!("DATABASE_URL not configured — history disabled");
        return DocumentStore::offline();
    };

    if config.is_memory() {
        info!("Using in-memory document store (records are lost on restart)");
        return DocumentStore::memory();
    }

    let pool = match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!("Failed to connect to PostgreSQL: {} — history disabled", e);
            return DocumentStore::offline();
        }
    };
    info!("PostgreSQL connected: {}", config.describe());

    match sqlx::migrate!("../../migrations").run(&pool).await {
        Ok(_) => {
            info!("Database migrations applied successfully");
            DocumentStore::postgres(pool)
        }
        Err(e) => {
            warn!("Failed to run migrations: {} — history disabled", e);
            DocumentStore::offline()
        }
    }
}
