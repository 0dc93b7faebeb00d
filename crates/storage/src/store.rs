use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use study_core::ActivityLog;
use tracing::{debug, warn};

use crate::collection::{Collection, Record, RecordId, Stored};
use crate::error::StorageError;
use crate::memory::{MemoryStore, Row};
use crate::postgres;
use crate::query::{ListQuery, CREATED_AT};

/// Where documents live.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres(PgPool),
    Memory(MemoryStore),
    /// No store configured or reachable. Reads are empty and writes vanish.
    Offline,
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Postgres(_) => "postgres",
            StoreBackend::Memory(_) => "memory",
            StoreBackend::Offline => "offline",
        }
    }
}

/// Typed list/get/save over the document collections.
///
/// Every public operation degrades instead of failing: backend errors are
/// logged with `warn!` and surface as an empty list, `None`, or a missing id.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: StoreBackend,
}

impl DocumentStore {
    pub fn new(backend: StoreBackend) -> Self {
        Self { backend }
    }

    pub fn offline() -> Self {
        Self::new(StoreBackend::Offline)
    }

    pub fn memory() -> Self {
        Self::new(StoreBackend::Memory(MemoryStore::new()))
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(StoreBackend::Postgres(pool))
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, StoreBackend::Offline)
    }

    // ── Degrading operations ─────────────────────────────────

    pub async fn list<T: Record>(&self, query: &ListQuery) -> Vec<Stored<T>> {
        match self.try_list(T::COLLECTION, query).await {
            Ok(rows) => rows
                .into_iter()
                .filter_map(|row| decode::<T>(T::COLLECTION, row))
                .collect(),
            Err(e) => {
                warn!("Failed to list {}: {}", T::COLLECTION, e);
                Vec::new()
            }
        }
    }

    /// `None` covers not found, malformed ids and backend failures alike.
    pub async fn get<T: Record>(&self, id: &str) -> Option<Stored<T>> {
        let Some(record_id) = RecordId::parse(id) else {
            debug!("Rejecting malformed {} id '{}'", T::COLLECTION, id);
            return None;
        };
        match self.try_get(T::COLLECTION, record_id).await {
            Ok(row) => row.and_then(|row| decode::<T>(T::COLLECTION, row)),
            Err(e) => {
                warn!("Failed to get {} {}: {}", T::COLLECTION, id, e);
                None
            }
        }
    }

    pub async fn save<T: Record>(&self, record: &T) -> Option<RecordId> {
        let result = match prepare_document(record) {
            Ok((doc, created_at)) => self.try_insert(T::COLLECTION, doc, created_at).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(id) => {
                debug!("Saved {} {}", T::COLLECTION, id);
                Some(id)
            }
            Err(e) => {
                warn!("Failed to save to {}: {}", T::COLLECTION, e);
                None
            }
        }
    }

    pub async fn log_activity(&self, entry: &ActivityLog) -> Option<RecordId> {
        self.save(entry).await
    }

    // ── Fallible primitives ──────────────────────────────────

    async fn try_list(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Row>, StorageError> {
        match &self.backend {
            StoreBackend::Postgres(pool) => Ok(postgres::list(pool, collection, query).await?),
            StoreBackend::Memory(mem) => Ok(mem.list(collection, query).await),
            StoreBackend::Offline => Err(StorageError::Offline),
        }
    }

    async fn try_get(&self, collection: Collection, id: RecordId) -> Result<Option<Row>, StorageError> {
        match &self.backend {
            StoreBackend::Postgres(pool) => Ok(postgres::get(pool, collection, id).await?),
            StoreBackend::Memory(mem) => Ok(mem.get(collection, id).await),
            StoreBackend::Offline => Err(StorageError::Offline),
        }
    }

    async fn try_insert(
        &self,
        collection: Collection,
        doc: Value,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, StorageError> {
        let id = RecordId::new();
        match &self.backend {
            StoreBackend::Postgres(pool) => {
                postgres::insert(pool, collection, id, &doc, created_at).await?
            }
            StoreBackend::Memory(mem) => {
                mem.insert(collection, Row { id, doc, created_at }).await
            }
            StoreBackend::Offline => return Err(StorageError::Offline),
        }
        Ok(id)
    }
}

/// Serialize a record, stamping `created_at` with the current time when the
/// record does not carry one.
pub fn prepare_document<T: Record>(record: &T) -> Result<(Value, DateTime<Utc>), StorageError> {
    let mut doc = serde_json::to_value(record)?;

    let existing = doc
        .get(CREATED_AT)
        .filter(|v| !v.is_null())
        .map(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()))
        .transpose()?;

    let created_at = existing.unwrap_or_else(Utc::now);
    if let Value::Object(map) = &mut doc {
        map.insert(CREATED_AT.to_string(), serde_json::to_value(created_at)?);
    }
    Ok((doc, created_at))
}

fn decode<T: Record>(collection: Collection, row: Row) -> Option<Stored<T>> {
    match serde_json::from_value::<T>(row.doc) {
        Ok(record) => Some(Stored { id: row.id, record }),
        Err(e) => {
            warn!("Skipping unreadable {} row {}: {}", collection, row.id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use study_core::{ActivityType, FileType, QuizAttempt, ReferenceType, Summary};

    use super::*;
    use crate::query::SortDirection;

    fn summary(title: &str) -> Summary {
        Summary::new(
            title.to_string(),
            FileType::Txt,
            "one two three".to_string(),
            "short".to_string(),
        )
    }

    fn attempt(score: u32, at: &str) -> QuizAttempt {
        QuizAttempt {
            quiz_id: "q".into(),
            score,
            max_score: 5,
            created_at: Some(at.parse().unwrap()),
        }
    }

    #[test]
    fn prepare_fills_missing_created_at() {
        let mut s = summary("t");
        s.created_at = None;
        let before = Utc::now();
        let (doc, created_at) = prepare_document(&s).unwrap();
        assert!(created_at >= before);
        assert!(doc["created_at"].is_string());
        assert_eq!(doc["word_count"], 3);
    }

    #[test]
    fn prepare_keeps_existing_created_at() {
        let a = attempt(1, "2024-03-01T10:00:00Z");
        let (doc, created_at) = prepare_document(&a).unwrap();
        assert_eq!(created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert_eq!(doc["created_at"], "2024-03-01T10:00:00Z");
    }

    #[tokio::test]
    async fn memory_save_then_get() {
        let store = DocumentStore::memory();
        let id = store.save(&summary("Biology")).await.unwrap();
        let found = store.get::<Summary>(&id.to_string()).await.unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.record.title, "Biology");
        assert!(found.record.created_at.is_some());
    }

    #[tokio::test]
    async fn get_unknown_or_malformed_id_is_none() {
        let store = DocumentStore::memory();
        store.save(&summary("x")).await.unwrap();
        assert!(store.get::<Summary>("nope").await.is_none());
        assert!(store.get::<Summary>(&RecordId::new().to_string()).await.is_none());
    }

    #[tokio::test]
    async fn collections_are_separate() {
        let store = DocumentStore::memory();
        let id = store.save(&summary("x")).await.unwrap();
        assert!(store.get::<QuizAttempt>(&id.to_string()).await.is_none());
        assert!(store.list::<QuizAttempt>(&ListQuery::default()).await.is_empty());
    }

    #[tokio::test]
    async fn list_newest_first_with_limit() {
        let store = DocumentStore::memory();
        store.save(&attempt(1, "2024-01-01T00:00:00Z")).await;
        store.save(&attempt(3, "2024-03-01T00:00:00Z")).await;
        store.save(&attempt(2, "2024-02-01T00:00:00Z")).await;

        let all = store.list::<QuizAttempt>(&ListQuery::default()).await;
        let scores: Vec<_> = all.iter().map(|s| s.record.score).collect();
        assert_eq!(scores, [3, 2, 1]);

        let recent = store.list::<QuizAttempt>(&ListQuery::recent(2)).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].record.score, 3);
    }

    #[tokio::test]
    async fn list_sorted_by_document_field() {
        let store = DocumentStore::memory();
        store.save(&attempt(2, "2024-01-01T00:00:00Z")).await;
        store.save(&attempt(10, "2024-02-01T00:00:00Z")).await;
        store.save(&attempt(1, "2024-03-01T00:00:00Z")).await;

        let query = ListQuery::default().sorted_by("score", SortDirection::Ascending);
        let scores: Vec<_> = store
            .list::<QuizAttempt>(&query)
            .await
            .iter()
            .map(|s| s.record.score)
            .collect();
        assert_eq!(scores, [1, 2, 10]);
    }

    #[tokio::test]
    async fn unreadable_rows_are_skipped() {
        let mem = MemoryStore::new();
        mem.insert(
            Collection::Summaries,
            Row {
                id: RecordId::new(),
                doc: serde_json::json!({ "unexpected": true }),
                created_at: Utc::now(),
            },
        )
        .await;
        let store = DocumentStore::new(StoreBackend::Memory(mem.clone()));
        store.save(&summary("good")).await.unwrap();

        let listed = store.list::<Summary>(&ListQuery::default()).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].record.title, "good");
        assert_eq!(mem.len(Collection::Summaries).await, 2);
    }

    #[tokio::test]
    async fn offline_store_degrades() {
        let store = DocumentStore::offline();
        assert!(!store.is_available());
        assert!(store.list::<Summary>(&ListQuery::default()).await.is_empty());
        assert!(store.save(&summary("x")).await.is_none());
        assert!(store.get::<Summary>(&RecordId::new().to_string()).await.is_none());
        let log = ActivityLog::new(ActivityType::Summarize, "d", "r", ReferenceType::Summary);
        assert!(store.log_activity(&log).await.is_none());
    }
}
