mod flat_vector_store;
mod qdrant_adapter;
mod sqlite_vector_store;
mod vector_store_factory;
mod vector_store_manager;

pub use flat_vector_store::{FLAT_INDEX_FILE, FlatVectorStore};
pub use qdrant_adapter::QdrantAdapter;
pub use sqlite_vector_store::{SQLITE_INDEX_FILE, SqliteVectorStore};
pub use vector_store_factory::{DEFAULT_QDRANT_PORT, VectorStoreConfig, VectorStoreFactory};
pub use vector_store_manager::VectorStoreManager;
