use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{VectorStoreConfig, VectorStoreFactory};
use crate::application::ports::{
    RecordFilter, SearchHit, VectorProvider, VectorStore, VectorStoreError,
};
use crate::domain::{Embedding, IndexStatus, VectorRecord};

struct ActiveStore {
    provider: VectorProvider,
    store: Arc<dyn VectorStore>,
}

/// Holds at most one connected backend. Writes take the write lock; searches and
/// status share the read lock.
#[derive(Default)]
pub struct VectorStoreManager {
    active: RwLock<Option<ActiveStore>>,
}

impl VectorStoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any active backend. A failed connect leaves the previous one in place.
    pub async fn connect(&self, config: &VectorStoreConfig) -> Result<VectorProvider, VectorStoreError> {
        let (provider, store) = VectorStoreFactory::connect(config).await?;
        *self.active.write().await = Some(ActiveStore { provider, store });
        Ok(provider)
    }

    /// Installs an already-built backend.
    pub async fn attach(&self, provider: VectorProvider, store: Arc<dyn VectorStore>) {
        *self.active.write().await = Some(ActiveStore { provider, store });
    }

    pub async fn provider(&self) -> Option<VectorProvider> {
        self.active.read().await.as_ref().map(|a| a.provider)
    }
}

#[async_trait]
impl VectorStore for VectorStoreManager {
    async fn index(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        let active = self.active.write().await;
        let active = active.as_ref().ok_or(VectorStoreError::NotConnected)?;
        active.store.index(record).await
    }

    async fn index_batch(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError> {
        let active = self.active.write().await;
        let active = active.as_ref().ok_or(VectorStoreError::NotConnected)?;
        active.store.index_batch(records).await
    }

    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        let active = self.active.read().await;
        let active = active.as_ref().ok_or(VectorStoreError::NotConnected)?;
        active.store.search(embedding, top_k, filter).await
    }

    async fn status(&self) -> Result<IndexStatus, VectorStoreError> {
        let active = self.active.read().await;
        let active = active.as_ref().ok_or(VectorStoreError::NotConnected)?;
        active.store.status().await
    }
}
