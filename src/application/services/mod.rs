mod document_classifier;
mod extraction_pipeline;
mod json_repair;
mod output_sanitizer;
mod page_transcriber;
mod rag_retriever;
mod structured_extractor;
mod table_detector;
mod text_normalizer;
mod text_table_extractor;
mod token_counter;

pub use document_classifier::{DocumentClassifier, PdfRoute, Route};
pub use extraction_pipeline::{DocumentInput, ExtractionError, ExtractionPipeline};
pub use json_repair::{MalformedOutput, parse_brace_span, parse_strict, repair_json, strip_code_fences};
pub use output_sanitizer::{strip_null_entries, strip_nulls};
pub use page_transcriber::{PageTranscriber, TranscriptionError, delimit_pages};
pub use rag_retriever::{DEFAULT_RETRIEVAL_QUERY, RagConfig, RagError, RagRetriever, RetrievedContext};
pub use structured_extractor::{
    EXTRACTION_SYSTEM_PROMPT, StructuredExtractionError, StructuredExtractor,
    build_extraction_prompt,
};
pub use table_detector::TableDetector;
pub use text_normalizer::normalize_page_text;
pub use text_table_extractor::{ExtractedContent, TextTableExtractor};
pub use token_counter::count_tokens;
