use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::collection::{Collection, RecordId};
use crate::query::{compare_json, ListQuery, SortDirection};

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub id: RecordId,
    pub doc: Value,
    pub created_at: DateTime<Utc>,
}

/// In-process document store used by tests and `memory://` demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<HashMap<Collection, Vec<Row>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn insert(&self, collection: Collection, row: Row) {
        self.rows
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(row);
    }

    pub(crate) async fn get(&self, collection: Collection, id: RecordId) -> Option<Row> {
        self.rows
            .read()
            .await
            .get(&collection)
            .and_then(|rows| rows.iter().find(|r| r.id == id).cloned())
    }

    pub(crate) async fn list(&self, collection: Collection, query: &ListQuery) -> Vec<Row> {
        let mut rows = self
            .rows
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default();

        if query.sorts_on_column() {
            rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        } else {
            rows.sort_by(|a, b| {
                compare_json(a.doc.get(&query.sort_field), b.doc.get(&query.sort_field))
            });
        }
        if query.direction == SortDirection::Descending {
            rows.reverse();
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        rows
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.rows
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}
