mod vector_store;

pub use vector_store::{
    DEFAULT_QDRANT_PORT, FLAT_INDEX_FILE, FlatVectorStore, QdrantAdapter, SQLITE_INDEX_FILE,
    SqliteVectorStore, VectorStoreConfig, VectorStoreFactory, VectorStoreManager,
};
