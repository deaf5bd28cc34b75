use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EmbedderFactory, EmbedderSettings};
use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

enum Slot {
    Uninitialized,
    Ready(Arc<dyn Embedder>),
    TornDown,
}

/// Process-wide embedder handle. The model is built on first use (or on `initialize`)
/// and released by `teardown`; later calls fail with `TornDown`.
pub struct SharedEmbedder {
    settings: EmbedderSettings,
    slot: RwLock<Slot>,
}

impl SharedEmbedder {
    pub fn new(settings: EmbedderSettings) -> Self {
        Self {
            settings,
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// Wraps an already-built embedder.
    pub fn from_embedder(settings: EmbedderSettings, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            settings,
            slot: RwLock::new(Slot::Ready(embedder)),
        }
    }

    pub async fn initialize(&self) -> Result<(), EmbedderError> {
        self.handle().await.map(|_| ())
    }

    pub async fn is_ready(&self) -> bool {
        matches!(*self.slot.read().await, Slot::Ready(_))
    }

    pub async fn teardown(&self) {
        let mut slot = self.slot.write().await;
        if matches!(*slot, Slot::Ready(_)) {
            tracing::info!("Embedding model released");
        }
        *slot = Slot::TornDown;
    }

    async fn handle(&self) -> Result<Arc<dyn Embedder>, EmbedderError> {
        match &*self.slot.read().await {
            Slot::Ready(embedder) => return Ok(Arc::clone(embedder)),
            Slot::TornDown => return Err(EmbedderError::TornDown),
            Slot::Uninitialized => {}
        }

        let mut slot = self.slot.write().await;
        match &*slot {
            Slot::Ready(embedder) => Ok(Arc::clone(embedder)),
            Slot::TornDown => Err(EmbedderError::TornDown),
            Slot::Uninitialized => {
                let settings = self.settings.clone();
                let embedder = tokio::task::spawn_blocking(move || EmbedderFactory::create(&settings))
                    .await
                    .map_err(|e| EmbedderError::ModelLoadFailed(e.to_string()))?
                    .map_err(|e| EmbedderError::ModelLoadFailed(e.to_string()))?;
                *slot = Slot::Ready(Arc::clone(&embedder));
                Ok(embedder)
            }
        }
    }
}

#[async_trait]
impl Embedder for SharedEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.handle().await?.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        self.handle().await?.embed_batch(texts).await
    }
}
