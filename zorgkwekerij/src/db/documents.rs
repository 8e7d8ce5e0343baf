//! Document store operations over the `submission_documents` table.
//!
//! All functions take the pool by reference and run a single statement; there
//! is no read-modify-write anywhere, so no transactions are needed.

use crate::db::errors::Result;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

/// One stored submission, as returned by the document store.
///
/// The identifier and timestamp are assigned at insert time; the submitted
/// fields live unmodified in `data`.
#[derive(Debug, Clone, FromRow)]
pub struct StoredDocument {
    pub id: Uuid,
    pub collection: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Flatten into the read-endpoint item shape: the submitted fields plus
    /// `id` and `created_at`.
    pub fn into_item(self) -> Value {
        let mut item = match self.data {
            Value::Object(map) => map,
            // Data is always written as an object; anything else would mean
            // the row was tampered with outside this service.
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        item.insert("id".to_string(), Value::String(self.id.to_string()));
        item.insert(
            "created_at".to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        Value::Object(item)
    }
}

/// Insert one document into the named collection.
///
/// Returns the stored representation including its assigned identifier, or
/// `None` if the insert returned no row. Absence signals failure to the
/// caller; it is never raised as a panic.
#[instrument(skip(pool, fields), fields(collection = collection), err)]
pub async fn create_document(pool: &PgPool, collection: &str, fields: Map<String, Value>) -> Result<Option<StoredDocument>> {
    let document = sqlx::query_as::<_, StoredDocument>(
        r#"
        INSERT INTO submission_documents (id, collection, data)
        VALUES ($1, $2, $3)
        RETURNING id, collection, data, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(collection)
    .bind(Value::Object(fields))
    .fetch_optional(pool)
    .await?;

    Ok(document)
}

/// Fetch up to `limit` documents from the named collection, newest first.
///
/// An empty filter matches all documents; a non-empty filter is applied as
/// JSONB containment (every filter key/value must appear in the document).
/// Recency ordering is explicit rather than an insertion-order coincidence.
#[instrument(skip(pool, filter), fields(collection = collection, limit = limit), err)]
pub async fn get_documents(pool: &PgPool, collection: &str, filter: &Map<String, Value>, limit: i64) -> Result<Vec<StoredDocument>> {
    let documents = sqlx::query_as::<_, StoredDocument>(
        r#"
        SELECT id, collection, data, created_at
        FROM submission_documents
        WHERE collection = $1 AND data @> $2
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(collection)
    .bind(Value::Object(filter.clone()))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(documents)
}

/// List the distinct collection names present in the store, up to `limit`.
/// Used only by the diagnostic probe.
#[instrument(skip(pool), err)]
pub async fn list_collections(pool: &PgPool, limit: i64) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT collection
        FROM submission_documents
        ORDER BY collection
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let names = rows.iter().map(|row| row.get("collection")).collect();
    Ok(names)
}

/// Name of the connected database. Used only by the diagnostic probe.
#[instrument(skip(pool), err)]
pub async fn database_name(pool: &PgPool) -> Result<String> {
    let name: String = sqlx::query_scalar("SELECT current_database()").fetch_one(pool).await?;
    Ok(name)
}
