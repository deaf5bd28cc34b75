use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::application::ports::{RecordFilter, SearchHit, VectorStore, VectorStoreError};
use crate::domain::{Embedding, IndexStatus, VectorRecord};

pub const FLAT_INDEX_FILE: &str = "flat_index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredVector {
    id: String,
    vector: Vec<f32>,
    payload: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FlatIndex {
    dimensions: Option<usize>,
    indexed_count: u64,
    last_sync: Option<DateTime<Utc>>,
    records: Vec<StoredVector>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl FlatIndex {
    fn rebuild_positions(&mut self) {
        self.positions = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
    }

    fn upsert(&mut self, record: StoredVector) {
        match self.positions.get(&record.id) {
            Some(&i) => self.records[i] = record,
            None => {
                self.positions.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
        self.indexed_count += 1;
        self.last_sync = Some(Utc::now());
    }
}

/// Brute-force index over unit vectors, ranked by squared L2 distance.
/// Persists to `<dir>/flat_index.json` when a directory is given.
pub struct FlatVectorStore {
    file: Option<PathBuf>,
    dimensions: usize,
    index: RwLock<FlatIndex>,
}

impl FlatVectorStore {
    pub fn in_memory(dimensions: usize) -> Self {
        Self {
            file: None,
            dimensions,
            index: RwLock::new(FlatIndex {
                dimensions: Some(dimensions),
                ..FlatIndex::default()
            }),
        }
    }

    /// Loads prior state from `dir` if present; otherwise starts empty.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>, dimensions: usize) -> Result<Self, VectorStoreError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(format!("{}: {e}", dir.display())))?;
        let file = dir.join(FLAT_INDEX_FILE);

        let mut index = match tokio::fs::read(&file).await {
            Ok(bytes) => serde_json::from_slice::<FlatIndex>(&bytes)
                .map_err(|e| VectorStoreError::PersistenceFailed(format!("{}: {e}", file.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FlatIndex::default(),
            Err(e) => return Err(VectorStoreError::ConnectionFailed(e.to_string())),
        };

        match index.dimensions {
            Some(existing) if existing != dimensions => {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: existing,
                    actual: dimensions,
                });
            }
            _ => index.dimensions = Some(dimensions),
        }
        index.rebuild_positions();

        info!(records = index.records.len(), indexed_count = index.indexed_count, "flat_index_opened");

        Ok(Self {
            file: Some(file),
            dimensions,
            index: RwLock::new(index),
        })
    }

    fn prepare(&self, record: VectorRecord) -> Result<StoredVector, VectorStoreError> {
        if record.embedding.dimensions() != self.dimensions {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimensions,
                actual: record.embedding.dimensions(),
            });
        }
        Ok(StoredVector {
            id: record.id,
            vector: record.embedding.normalized().values,
            payload: record.payload,
        })
    }

    async fn persist(&self, index: &FlatIndex) -> Result<(), VectorStoreError> {
        let Some(file) = self.file.clone() else {
            return Ok(());
        };
        let bytes =
            serde_json::to_vec(index).map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))?;

        tokio::task::spawn_blocking(move || write_atomically(&file, &bytes))
            .await
            .map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))?
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn write_atomically(file: &Path, bytes: &[u8]) -> Result<(), VectorStoreError> {
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))?;
    temp.write_all(bytes)
        .map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))?;
    temp.persist(file)
        .map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl VectorStore for FlatVectorStore {
    async fn index(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        self.index_batch(vec![record]).await
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn index_batch(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError> {
        let prepared = records
            .into_iter()
            .map(|r| self.prepare(r))
            .collect::<Result<Vec<_>, _>>()?;

        // Memory only changes once the staged index is on disk.
        let mut index = self.index.write().await;
        let mut staged = index.clone();
        for record in prepared {
            staged.upsert(record);
        }
        self.persist(&staged).await?;
        *index = staged;
        Ok(())
    }

    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        if embedding.dimensions() != self.dimensions {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.dimensions(),
            });
        }
        let query = embedding.normalized();
        let index = self.index.read().await;

        let mut ranked: Vec<(f32, &StoredVector)> = index
            .records
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(&r.payload)))
            .map(|r| (squared_l2(&query.values, &r.vector), r))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(ranked
            .into_iter()
            .take(top_k)
            .map(|(distance, r)| SearchHit {
                id: r.id.clone(),
                score: 1.0 - distance / 2.0,
                payload: r.payload.clone(),
            })
            .collect())
    }

    async fn status(&self) -> Result<IndexStatus, VectorStoreError> {
        let index = self.index.read().await;
        Ok(IndexStatus {
            total_indexed: index.indexed_count,
            last_sync: index.last_sync,
        })
    }
}
