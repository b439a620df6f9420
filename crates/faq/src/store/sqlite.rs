//! SQLite-backed document store.
//!
//! Every collection lives in a single `documents` table; each row carries
//! the JSON-encoded fields. The autoincrement `seq` column records
//! insertion order, which `list` returns.

use super::{increment_field, merge_fields, Document, DocumentStore, Fields};
use helpdesk_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tokio::sync::Mutex;

/// Document store persisted in a SQLite file.
///
/// All access goes through one connection behind an async mutex, so
/// read-modify-write operations (`update`, `increment`) never interleave.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path`.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Store(format!("Failed to create store directory: {}", e)))?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Store(format!("Failed to open SQLite store: {}", e)))?;

        tracing::debug!("Opened SQLite store at {:?}", db_path);
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Store(format!("Failed to open SQLite store: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                UNIQUE (collection, id)
            );

            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq);
            "#,
        )
        .map_err(|e| AppError::Store(format!("Failed to create tables: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn encode_body(fields: &Fields) -> AppResult<String> {
    serde_json::to_string(fields)
        .map_err(|e| AppError::Store(format!("Failed to encode document: {}", e)))
}

fn decode_body(id: &str, body: &str) -> AppResult<Fields> {
    serde_json::from_str(body)
        .map_err(|e| AppError::Store(format!("Corrupt document '{}': {}", id, e)))
}

/// Load a document body inside an open connection or transaction.
fn load_fields(conn: &Connection, collection: &str, id: &str) -> AppResult<Option<Fields>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| AppError::Store(format!("Failed to read {}/{}: {}", collection, id, e)))?;

    body.map(|b| decode_body(id, &b)).transpose()
}

fn store_fields(conn: &Connection, collection: &str, id: &str, fields: &Fields) -> AppResult<()> {
    conn.execute(
        "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
        params![collection, id, encode_body(fields)?],
    )
    .map_err(|e| AppError::Store(format!("Failed to write {}/{}: {}", collection, id, e)))?;
    Ok(())
}

fn not_found(collection: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{}/{}", collection, id))
}

#[async_trait::async_trait]
impl DocumentStore for SqliteStore {
    async fn create(&self, collection: &str, fields: Fields) -> AppResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let body = encode_body(&fields)?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection, id, body],
        )
        .map_err(|e| AppError::Store(format!("Failed to insert into {}: {}", collection, e)))?;

        tracing::debug!("Created {}/{}", collection, id);
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()> {
        let body = encode_body(&fields)?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
            params![collection, id, body],
        )
        .map_err(|e| AppError::Store(format!("Failed to write {}/{}: {}", collection, id, e)))?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY seq")
            .map_err(|e| AppError::Store(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| AppError::Store(format!("Failed to list {}: {}", collection, e)))?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) =
                row.map_err(|e| AppError::Store(format!("Failed to read row: {}", e)))?;
            let fields = decode_body(&id, &body)?;
            documents.push(Document { id, fields });
        }

        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let conn = self.conn.lock().await;
        Ok(load_fields(&conn, collection, id)?.map(|fields| Document {
            id: id.to_string(),
            fields,
        }))
    }

    async fn update(&self, collection: &str, id: &str, patch: Fields) -> AppResult<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Store(format!("Failed to begin transaction: {}", e)))?;

        let mut fields = load_fields(&tx, collection, id)?.ok_or_else(|| not_found(collection, id))?;
        merge_fields(&mut fields, patch);
        store_fields(&tx, collection, id, &fields)?;

        tx.commit()
            .map_err(|e| AppError::Store(format!("Failed to commit update: {}", e)))
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .map_err(|e| AppError::Store(format!("Failed to delete {}/{}: {}", collection, id, e)))?;

        if affected == 0 {
            return Err(not_found(collection, id));
        }
        Ok(())
    }

    async fn increment(&self, collection: &str, id: &str, field: &str, by: i64) -> AppResult<i64> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Store(format!("Failed to begin transaction: {}", e)))?;

        let mut fields = load_fields(&tx, collection, id)?.ok_or_else(|| not_found(collection, id))?;
        let next = increment_field(&mut fields, field, by).map_err(AppError::Store)?;
        store_fields(&tx, collection, id, &fields)?;

        tx.commit()
            .map_err(|e| AppError::Store(format!("Failed to commit increment: {}", e)))?;
        Ok(next)
    }
}
