use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{CollectionConfig, VectorProvider, VectorStore, VectorStoreError};

use super::{FlatVectorStore, QdrantAdapter, SqliteVectorStore};

pub const DEFAULT_QDRANT_PORT: u16 = 6334;

/// Everything `connect` needs. `provider` is the raw tag so unknown names surface here.
#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub provider: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<PathBuf>,
    pub collection_name: String,
    pub vector_size: usize,
}

impl VectorStoreConfig {
    pub fn new(provider: impl Into<String>, vector_size: usize) -> Self {
        Self {
            provider: provider.into(),
            host: None,
            port: None,
            path: None,
            collection_name: "documents".to_string(),
            vector_size,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Per-collection directory under `path`.
    fn collection_dir(&self) -> Option<PathBuf> {
        self.path.as_ref().map(|p| p.join(&self.collection_name))
    }

    fn qdrant_url(&self) -> String {
        let host = self.host.as_deref().unwrap_or("localhost");
        let port = self.port.unwrap_or(DEFAULT_QDRANT_PORT);
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{port}")
        } else {
            format!("http://{host}:{port}")
        }
    }
}

pub struct VectorStoreFactory;

impl VectorStoreFactory {
    pub async fn connect(
        config: &VectorStoreConfig,
    ) -> Result<(VectorProvider, Arc<dyn VectorStore>), VectorStoreError> {
        let provider: VectorProvider = config.provider.parse()?;
        tracing::info!(provider = %provider, collection = %config.collection_name, "Connecting vector store");

        let store: Arc<dyn VectorStore> = match provider {
            VectorProvider::Flat => match config.collection_dir() {
                Some(dir) => Arc::new(FlatVectorStore::open(dir, config.vector_size).await?),
                None => Arc::new(FlatVectorStore::in_memory(config.vector_size)),
            },
            VectorProvider::Sqlite => match config.collection_dir() {
                Some(dir) => Arc::new(SqliteVectorStore::open(dir, config.vector_size).await?),
                None => Arc::new(SqliteVectorStore::in_memory(config.vector_size).await?),
            },
            VectorProvider::Qdrant => {
                let collection =
                    CollectionConfig::new(&config.collection_name, config.vector_size as u64);
                Arc::new(QdrantAdapter::connect(&config.qdrant_url(), &collection).await?)
            }
        };

        Ok((provider, store))
    }
}
