mod collection_config;
mod embedder;
mod file_loader;
mod llm_client;
mod ocr_engine;
mod payload_field_type;
mod payload_index;
mod pdf_engine;
mod record_filter;
mod search_result;
mod vector_provider;
mod vector_store;
mod vector_store_error;

pub use collection_config::CollectionConfig;
pub use embedder::{Embedder, EmbedderError};
pub use file_loader::{FileLoader, FileLoaderError};
pub use llm_client::{LlmClient, LlmClientError};
pub use ocr_engine::{OcrEngine, OcrError};
pub use payload_field_type::PayloadFieldType;
pub use payload_index::PayloadIndex;
pub use pdf_engine::{DocumentReadError, PdfEngine};
pub use record_filter::RecordFilter;
pub use search_result::SearchHit;
pub use vector_provider::VectorProvider;
pub use vector_store::VectorStore;
pub use vector_store_error::VectorStoreError;
