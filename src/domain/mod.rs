mod batch_report;
mod chunk;
mod document;
mod embedding;
mod extraction_result;
mod extraction_schema;
mod failure_kind;
mod page;
mod page_layout;
mod table;
mod vector_record;

pub use batch_report::{BatchItemReport, BatchItemStatus};
pub use chunk::{Chunk, ChunkId, ChunkMetadata, DocumentId};
pub use document::{Document, DocumentKind};
pub use embedding::Embedding;
pub use extraction_result::{ExtractionResult, ExtractionStatus, ExtractionStrategy};
pub use extraction_schema::{ExtractionSchema, FieldSpec};
pub use failure_kind::FailureKind;
pub use page::Page;
pub use page_layout::{Bounds, PageLayout, TextBlock, TextLine, TextSpan};
pub use table::Table;
pub use vector_record::{IndexStatus, VectorRecord};
