use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::application::ports::{RecordFilter, SearchHit, VectorStore, VectorStoreError};
use crate::domain::{Embedding, IndexStatus, VectorRecord};

pub const SQLITE_INDEX_FILE: &str = "vectors.sqlite3";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id          TEXT PRIMARY KEY,
    document_id TEXT,
    embedding   BLOB NOT NULL,
    payload     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS records_document_id ON records (document_id);
CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// Embedded SQLite collection ranked by cosine similarity.
pub struct SqliteVectorStore {
    connection: Arc<Mutex<Connection>>,
    dimensions: usize,
}

fn storage<E: std::fmt::Display>(e: E) -> VectorStoreError {
    VectorStoreError::PersistenceFailed(e.to_string())
}

impl SqliteVectorStore {
    pub async fn in_memory(dimensions: usize) -> Result<Self, VectorStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;
        Self::initialize(connection, dimensions).await
    }

    /// Opens (or creates) `<dir>/vectors.sqlite3`.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>, dimensions: usize) -> Result<Self, VectorStoreError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(format!("{}: {e}", dir.display())))?;
        let file = dir.join(SQLITE_INDEX_FILE);

        let connection = tokio::task::spawn_blocking(move || Connection::open(file))
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;
        Self::initialize(connection, dimensions).await
    }

    async fn initialize(connection: Connection, dimensions: usize) -> Result<Self, VectorStoreError> {
        let store = Self {
            connection: Arc::new(Mutex::new(connection)),
            dimensions,
        };

        let stored = store
            .with_connection(move |conn| {
                conn.execute_batch(SCHEMA).map_err(storage)?;
                let stored: Option<String> = conn
                    .query_row("SELECT value FROM meta WHERE key = 'dimensions'", [], |row| row.get(0))
                    .optional()
                    .map_err(storage)?;
                if stored.is_none() {
                    conn.execute(
                        "INSERT INTO meta (key, value) VALUES ('dimensions', ?1)",
                        params![dimensions.to_string()],
                    )
                    .map_err(storage)?;
                }
                Ok(stored)
            })
            .await?;

        match stored.and_then(|s| s.parse::<usize>().ok()) {
            Some(existing) if existing != dimensions => {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: existing,
                    actual: dimensions,
                });
            }
            _ => {}
        }

        info!(dimensions, "sqlite_index_opened");
        Ok(store)
    }

    async fn with_connection<T, F>(&self, work: F) -> Result<T, VectorStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, VectorStoreError> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection
                .lock()
                .map_err(|_| VectorStoreError::PersistenceFailed("connection lock poisoned".to_string()))?;
            work(&mut guard)
        })
        .await
        .map_err(storage)?
    }

    fn check_dimensions(&self, embedding: &Embedding) -> Result<(), VectorStoreError> {
        if embedding.dimensions() != self.dimensions {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.dimensions(),
            });
        }
        Ok(())
    }
}

fn encode_vector(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn index(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        self.index_batch(vec![record]).await
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn index_batch(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError> {
        for record in &records {
            self.check_dimensions(&record.embedding)?;
        }

        self.with_connection(move |conn| {
            let tx = conn.transaction().map_err(storage)?;
            for record in &records {
                let document_id = record
                    .payload
                    .get("document_id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let payload = serde_json::to_string(&record.payload).map_err(storage)?;
                tx.execute(
                    "INSERT OR REPLACE INTO records (id, document_id, embedding, payload) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![record.id, document_id, encode_vector(&record.embedding.values), payload],
                )
                .map_err(storage)?;
            }
            tx.execute(
                "INSERT INTO meta (key, value) VALUES ('indexed_count', ?1) \
                 ON CONFLICT(key) DO UPDATE SET value = CAST(value AS INTEGER) + ?1",
                params![records.len() as i64],
            )
            .map_err(storage)?;
            tx.execute(
                "INSERT INTO meta (key, value) VALUES ('last_sync', ?1) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![Utc::now().to_rfc3339()],
            )
            .map_err(storage)?;
            tx.commit().map_err(storage)
        })
        .await
    }

    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        self.check_dimensions(embedding)?;
        let query = embedding.clone();
        let document_id = filter.map(|f| f.document_id.clone());

        self.with_connection(move |conn| {
            let mut statement = conn
                .prepare(
                    "SELECT id, embedding, payload FROM records \
                     WHERE ?1 IS NULL OR document_id = ?1",
                )
                .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

            let rows = statement
                .query_map(params![document_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })
                .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

            let mut hits = Vec::new();
            for row in rows {
                let (id, blob, payload) = row.map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;
                let payload: Map<String, Value> = serde_json::from_str(&payload).map_err(storage)?;
                let score = query.cosine_similarity(&Embedding::new(decode_vector(&blob)));
                hits.push(SearchHit { id, score, payload });
            }

            hits.sort_by(|a, b| b.score.total_cmp(&a.score));
            hits.truncate(top_k);
            Ok(hits)
        })
        .await
    }

    async fn status(&self) -> Result<IndexStatus, VectorStoreError> {
        self.with_connection(|conn| {
            let read = |key: &str| -> Result<Option<String>, VectorStoreError> {
                conn.query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| row.get(0))
                    .optional()
                    .map_err(storage)
            };
            let total_indexed = read("indexed_count")?
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0);
            let last_sync = read("last_sync")?
                .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
                .map(|t| t.with_timezone(&Utc));
            Ok(IndexStatus {
                total_indexed,
                last_sync,
            })
        })
        .await
    }
}
