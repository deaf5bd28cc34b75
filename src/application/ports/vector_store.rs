use async_trait::async_trait;

use super::{RecordFilter, SearchHit, VectorStoreError};
use crate::domain::{Embedding, IndexStatus, VectorRecord};

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts or replaces one record, bumping the indexed count and last-sync time.
    async fn index(&self, record: VectorRecord) -> Result<(), VectorStoreError>;

    /// Indexes every record in order. Backends override this to persist once per batch.
    async fn index_batch(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError> {
        for record in records {
            self.index(record).await?;
        }
        Ok(())
    }

    /// Up to `top_k` hits, best first.
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<SearchHit>, VectorStoreError>;

    async fn status(&self) -> Result<IndexStatus, VectorStoreError>;
}
