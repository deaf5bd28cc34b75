#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("unsupported vector store provider: {0}")]
    UnsupportedProvider(String),
    #[error("vector store is not connected")]
    NotConnected,
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("collection creation failed: {0}")]
    CollectionCreationFailed(String),
    #[error("payload index creation failed: {0}")]
    PayloadIndexFailed(String),
    #[error("dimension mismatch: collection has {expected}, record has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("upsert failed: {0}")]
    UpsertFailed(String),
    #[error("search failed: {0}")]
    SearchFailed(String),
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
}
