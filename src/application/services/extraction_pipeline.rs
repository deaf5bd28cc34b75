use std::sync::Arc;

use super::document_classifier::{DocumentClassifier, PdfRoute, Route};
use super::page_transcriber::{PageTranscriber, TranscriptionError, delimit_pages};
use super::rag_retriever::{RagError, RagRetriever};
use super::structured_extractor::{StructuredExtractionError, StructuredExtractor};
use super::text_table_extractor::TextTableExtractor;
use crate::application::ports::{
    DocumentReadError, EmbedderError, FileLoader, FileLoaderError, LlmClientError, OcrEngine,
    OcrError, PdfEngine, VectorStoreError,
};
use crate::domain::{
    BatchItemReport, BatchItemStatus, Document, DocumentKind, ExtractionResult,
    ExtractionSchema, ExtractionStatus, ExtractionStrategy, FailureKind, Table,
};

/// Raw bytes plus what the caller knows about them.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
    pub source_path: Option<String>,
}

impl DocumentInput {
    pub fn new(data: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
            content_type: content_type.into(),
            source_path: None,
        }
    }

    pub fn with_source_path(mut self, source_path: impl Into<String>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }
}

pub struct ExtractionPipeline {
    classifier: DocumentClassifier,
    file_loader: Arc<dyn FileLoader>,
    pdf_engine: Arc<dyn PdfEngine>,
    ocr_engine: Arc<dyn OcrEngine>,
    transcriber: PageTranscriber,
    text_tables: TextTableExtractor,
    rag: RagRetriever,
    extractor: StructuredExtractor,
    rag_enabled: bool,
}

/// Text handed to the model, and how it was obtained.
struct Content {
    text: String,
    tables: Vec<Table>,
    strategy: ExtractionStrategy,
    page_count: Option<u32>,
}

impl ExtractionPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        classifier: DocumentClassifier,
        file_loader: Arc<dyn FileLoader>,
        pdf_engine: Arc<dyn PdfEngine>,
        ocr_engine: Arc<dyn OcrEngine>,
        transcriber: PageTranscriber,
        text_tables: TextTableExtractor,
        rag: RagRetriever,
        extractor: StructuredExtractor,
        rag_enabled: bool,
    ) -> Self {
        Self {
            classifier,
            file_loader,
            pdf_engine,
            ocr_engine,
            transcriber,
            text_tables,
            rag,
            extractor,
            rag_enabled,
        }
    }

    #[tracing::instrument(
        skip(self, input, schema, instruction),
        fields(filename = %input.filename, content_type = %input.content_type)
    )]
    pub async fn extract(
        &self,
        input: DocumentInput,
        schema: &ExtractionSchema,
        instruction: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let route = self
            .classifier
            .route(&input.content_type, &input.filename)
            .ok_or_else(|| ExtractionError::UnsupportedFormat {
                filename: input.filename.clone(),
                content_type: input.content_type.clone(),
            })?;

        let kind = match route {
            Route::ImageOcr => DocumentKind::Image,
            Route::DocxText => DocumentKind::Docx,
            Route::PlainText => DocumentKind::Text,
            Route::Pdf => DocumentKind::Pdf,
        };
        let mut document = Document::new(
            input.filename,
            input.content_type,
            kind,
            input.data.len() as u64,
        );
        if let Some(path) = input.source_path {
            document = document.with_source_path(path);
        }

        let data: Arc<[u8]> = input.data.into();
        let content = match route {
            Route::ImageOcr => Content {
                text: self.ocr_engine.transcribe_page(&data, 1).await?,
                tables: Vec::new(),
                strategy: ExtractionStrategy::ImageOcr,
                page_count: Some(1),
            },
            Route::DocxText | Route::PlainText => Content {
                text: self.file_loader.extract_text(&data, &document).await?,
                tables: Vec::new(),
                strategy: if route == Route::DocxText {
                    ExtractionStrategy::DocxText
                } else {
                    ExtractionStrategy::PlainText
                },
                page_count: None,
            },
            Route::Pdf => self.read_pdf(data, &mut document).await?,
        };

        tracing::info!(
            document_id = %document.id,
            strategy = %content.strategy,
            page_count = content.page_count,
            chars = content.text.len(),
            "Content ready for extraction"
        );

        let extracted_data = self
            .extractor
            .extract(&content.text, &content.tables, instruction, schema)
            .await?;

        Ok(ExtractionResult {
            document_id: document.id.to_string(),
            status: ExtractionStatus::Success,
            strategy: content.strategy,
            page_count: content.page_count,
            extracted_data,
            schema_used: schema.target_schema(),
            tables: content.tables,
        })
    }

    async fn read_pdf(
        &self,
        data: Arc<[u8]>,
        document: &mut Document,
    ) -> Result<Content, ExtractionError> {
        let engine = Arc::clone(&self.pdf_engine);
        let bytes = Arc::clone(&data);
        let layouts = tokio::task::spawn_blocking(move || engine.read_layout(&bytes))
            .await
            .map_err(|e| DocumentReadError::TaskJoin(e.to_string()))??;

        let page_count = u32::try_from(layouts.len()).unwrap_or(u32::MAX);
        document.page_count = Some(page_count);

        match self.classifier.route_pdf(&layouts) {
            PdfRoute::Direct => {
                let extracted = self.text_tables.extract(&layouts);
                Ok(Content {
                    text: extracted.text,
                    tables: extracted.tables,
                    strategy: ExtractionStrategy::PdfDirect,
                    page_count: Some(page_count),
                })
            }
            PdfRoute::Large if self.rag_enabled => {
                let retrieved = self.rag.index_and_retrieve(data, document, &layouts).await?;
                Ok(Content {
                    text: retrieved.context,
                    tables: Vec::new(),
                    strategy: ExtractionStrategy::PdfRetrieval,
                    page_count: Some(page_count),
                })
            }
            PdfRoute::Large => {
                let pages = layouts.iter().map(|l| l.number).collect();
                let transcribed = self.transcriber.transcribe(data, pages).await?;
                Ok(Content {
                    text: delimit_pages(&transcribed),
                    tables: Vec::new(),
                    strategy: ExtractionStrategy::PdfFullOcr,
                    page_count: Some(page_count),
                })
            }
        }
    }

    /// Runs every document in order. A failure is reported against its document only.
    pub async fn extract_batch(
        &self,
        inputs: Vec<DocumentInput>,
        schema: &ExtractionSchema,
        instruction: &str,
    ) -> Vec<BatchItemReport> {
        let mut reports = Vec::with_capacity(inputs.len());
        for input in inputs {
            let filename = input.filename.clone();
            match self.extract(input, schema, instruction).await {
                Ok(result) => reports.push(BatchItemReport::success(filename, result)),
                Err(e) => {
                    tracing::warn!(filename = %filename, error = %e, kind = %e.kind(), "Document failed");
                    let status = match &e {
                        ExtractionError::UnsupportedFormat { .. } => BatchItemStatus::UnsupportedType,
                        _ => BatchItemStatus::Failed,
                    };
                    reports.push(BatchItemReport::failure(filename, status, e.to_string(), e.kind()));
                }
            }
        }
        reports
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported document type: {filename} ({content_type})")]
    UnsupportedFormat {
        filename: String,
        content_type: String,
    },
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("document read: {0}")]
    DocumentRead(#[from] DocumentReadError),
    #[error("ocr: {0}")]
    Ocr(#[from] OcrError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error("retrieval: {0}")]
    Rag(#[from] RagError),
    #[error("extraction: {0}")]
    Extraction(#[from] StructuredExtractionError),
}

impl ExtractionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnsupportedFormat { .. } | Self::FileLoading(_) => FailureKind::InputFormat,
            Self::DocumentRead(e) => document_read_kind(e),
            Self::Ocr(e) => ocr_kind(e),
            Self::Transcription(e) => transcription_kind(e),
            Self::Rag(RagError::Transcription(e)) => transcription_kind(e),
            Self::Rag(RagError::Embedding(e)) => embedder_kind(e),
            Self::Rag(RagError::Storage(e)) => vector_store_kind(e),
            Self::Extraction(StructuredExtractionError::Completion(e)) => llm_kind(e),
            Self::Extraction(StructuredExtractionError::Malformed(_)) => FailureKind::MalformedOutput,
        }
    }
}

fn document_read_kind(e: &DocumentReadError) -> FailureKind {
    match e {
        DocumentReadError::EngineUnavailable(_) => FailureKind::Configuration,
        _ => FailureKind::InputFormat,
    }
}

fn ocr_kind(e: &OcrError) -> FailureKind {
    match e {
        OcrError::Transport { .. } | OcrError::Upstream { .. } => FailureKind::UpstreamCall,
        OcrError::MissingCompletion { .. } => FailureKind::MalformedOutput,
        OcrError::ImageEncoding(_) => FailureKind::InputFormat,
    }
}

fn transcription_kind(e: &TranscriptionError) -> FailureKind {
    match e {
        TranscriptionError::Render(e) => document_read_kind(e),
        TranscriptionError::Ocr(e) => ocr_kind(e),
    }
}

fn embedder_kind(e: &EmbedderError) -> FailureKind {
    match e {
        EmbedderError::ModelLoadFailed(_) | EmbedderError::TornDown => FailureKind::Configuration,
        EmbedderError::InvalidResponse(_) => FailureKind::MalformedOutput,
        _ => FailureKind::UpstreamCall,
    }
}

fn vector_store_kind(e: &VectorStoreError) -> FailureKind {
    match e {
        VectorStoreError::UnsupportedProvider(_)
        | VectorStoreError::NotConnected
        | VectorStoreError::DimensionMismatch { .. } => FailureKind::Configuration,
        _ => FailureKind::UpstreamCall,
    }
}

fn llm_kind(e: &LlmClientError) -> FailureKind {
    match e {
        LlmClientError::InvalidResponse(_) => FailureKind::MalformedOutput,
        _ => FailureKind::UpstreamCall,
    }
}
