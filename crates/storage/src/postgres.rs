use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Row as _};
use uuid::Uuid;

use crate::collection::{Collection, RecordId};
use crate::memory::Row;
use crate::query::ListQuery;

// Table names and sort direction come from enums, never from callers.
// The JSON sort field is always a bound parameter.

pub(crate) async fn insert(
    pool: &PgPool,
    collection: Collection,
    id: RecordId,
    doc: &Value,
    created_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} (id, doc, created_at) VALUES ($1, $2, $3)",
        collection.table()
    );
    sqlx::query(&sql)
        .bind(id.0)
        .bind(doc)
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn get(
    pool: &PgPool,
    collection: Collection,
    id: RecordId,
) -> Result<Option<Row>, sqlx::Error> {
    let sql = format!(
        "SELECT id, doc, created_at FROM {} WHERE id = $1",
        collection.table()
    );
    let row = sqlx::query(&sql).bind(id.0).fetch_optional(pool).await?;
    row.as_ref().map(to_row).transpose()
}

pub(crate) async fn list(
    pool: &PgPool,
    collection: Collection,
    query: &ListQuery,
) -> Result<Vec<Row>, sqlx::Error> {
    let limit = query.limit.map(i64::from);
    let rows = if query.sorts_on_column() {
        let sql = format!(
            "SELECT id, doc, created_at FROM {} ORDER BY created_at {} LIMIT $1",
            collection.table(),
            query.direction.sql()
        );
        sqlx::query(&sql).bind(limit).fetch_all(pool).await?
    } else {
        let sql = format!(
            "SELECT id, doc, created_at FROM {} ORDER BY doc -> $1 {}, created_at {} LIMIT $2",
            collection.table(),
            query.direction.sql(),
            query.direction.sql()
        );
        sqlx::query(&sql)
            .bind(&query.sort_field)
            .bind(limit)
            .fetch_all(pool)
            .await?
    };
    rows.iter().map(to_row).collect()
}

fn to_row(row: &sqlx::postgres::PgRow) -> Result<Row, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    Ok(Row {
        id: RecordId(id),
        doc: row.try_get("doc")?,
        created_at: row.try_get("created_at")?,
    })
}
