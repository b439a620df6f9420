//! Document store abstraction.
//!
//! The helpdesk treats persistence as named collections of JSON documents
//! addressed by id. Filtering happens in-process over full snapshots.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use helpdesk_core::AppResult;

/// Stored document fields.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A document and its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Collection/document store.
///
/// `list` returns documents in insertion order. Writes to a missing id fail
/// with `AppError::NotFound`; other failures are `AppError::Store`.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document under a fresh id and return the id.
    async fn create(&self, collection: &str, fields: Fields) -> AppResult<String>;

    /// Insert or replace the document stored under `id`.
    async fn put(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()>;

    /// All documents of a collection in insertion order.
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>>;

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Shallow merge of `patch` into the stored fields.
    async fn update(&self, collection: &str, id: &str, patch: Fields) -> AppResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Atomically add `by` to an integer field (missing or null counts as 0)
    /// and return the new value.
    async fn increment(&self, collection: &str, id: &str, field: &str, by: i64) -> AppResult<i64>;
}

/// Merge `patch` into `fields`, replacing top-level keys.
pub(crate) fn merge_fields(fields: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        fields.insert(key, value);
    }
}

/// Add `by` to `fields[field]`, treating a missing or null value as 0.
pub(crate) fn increment_field(fields: &mut Fields, field: &str, by: i64) -> Result<i64, String> {
    let current = match fields.get(field) {
        None | Some(serde_json::Value::Null) => 0,
        Some(value) => value
            .as_i64()
            .ok_or_else(|| format!("field '{}' is not an integer: {}", field, value))?,
    };

    let next = current
        .checked_add(by)
        .ok_or_else(|| format!("field '{}' would overflow", field))?;
    fields.insert(field.to_string(), serde_json::Value::from(next));
    Ok(next)
}
