use thiserror::Error;

/// Backend failures. Never leaves the crate's public list/get/save calls,
/// which log and degrade instead.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no store configured")]
    Offline,
}
