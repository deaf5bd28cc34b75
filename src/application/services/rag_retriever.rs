use std::sync::Arc;

use super::page_transcriber::{PageTranscriber, TranscriptionError};
use super::text_normalizer::normalize_page_text;
use crate::application::ports::{
    Embedder, EmbedderError, RecordFilter, SearchHit, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, ChunkMetadata, Document, PageLayout};

pub const DEFAULT_RETRIEVAL_QUERY: &str = "Find text related to invoice number, dates, totals, \
     taxes, supplier, customer, line items, amounts, payment terms.";

#[derive(Debug, Clone)]
pub struct RagConfig {
    pub top_k: usize,
    pub query: String,
    pub min_meaningful_text_chars: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 7,
            query: DEFAULT_RETRIEVAL_QUERY.to_string(),
            min_meaningful_text_chars: 10,
        }
    }
}

/// Context handed to the extraction call for a large or scanned document.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedContext {
    pub context: String,
    pub chunk_count: usize,
    pub retrieved: usize,
    pub ocr_pages: usize,
}

pub struct RagRetriever {
    transcriber: PageTranscriber,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    config: RagConfig,
}

impl RagRetriever {
    pub fn new(
        transcriber: PageTranscriber,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        config: RagConfig,
    ) -> Self {
        Self {
            transcriber,
            embedder,
            vector_store,
            config,
        }
    }

    /// Chunks every page (OCR for pages without usable native text), indexes the chunks,
    /// then pulls the top-K chunks of this document for the retrieval query.
    #[tracing::instrument(
        skip(self, data, layouts),
        fields(document_id = %document.id, filename = %document.filename, page_count = layouts.len())
    )]
    pub async fn index_and_retrieve(
        &self,
        data: Arc<[u8]>,
        document: &Document,
        layouts: &[PageLayout],
    ) -> Result<RetrievedContext, RagError> {
        let mut page_texts: Vec<(u32, String)> = Vec::with_capacity(layouts.len());
        let mut needs_ocr = Vec::new();

        for layout in layouts {
            let native = normalize_page_text(&layout.plain_text());
            if native.trim().chars().count() >= self.config.min_meaningful_text_chars {
                page_texts.push((layout.number, native));
            } else {
                needs_ocr.push(layout.number);
            }
        }

        let ocr_pages = needs_ocr.len();
        let transcribed = self.transcriber.transcribe(data, needs_ocr).await?;
        page_texts.extend(transcribed);
        page_texts.sort_by_key(|(number, _)| *number);

        let chunks: Vec<Chunk> = page_texts
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(page_number, text)| {
                Chunk::new(
                    text,
                    ChunkMetadata {
                        document_id: document.id,
                        filename: document.filename.clone(),
                        page_number,
                        source_path: document.source_path_or_filename().to_string(),
                    },
                )
            })
            .collect();

        let chunk_count = chunks.len();
        tracing::info!(chunk_count, ocr_pages, "Document chunked");

        if chunks.is_empty() {
            return Ok(RetrievedContext {
                context: String::new(),
                chunk_count,
                retrieved: 0,
                ocr_pages,
            });
        }

        self.index_chunks(chunks).await?;

        let query_embedding = self
            .embedder
            .embed(&self.config.query)
            .await
            .map_err(RagError::Embedding)?;

        let filter = RecordFilter::document(document.id.to_string());
        let hits = self
            .vector_store
            .search(&query_embedding, self.config.top_k, Some(&filter))
            .await?;

        let retrieved: Vec<Chunk> = hits.iter().filter_map(SearchHit::to_chunk).collect();
        let pages: Vec<u32> = retrieved.iter().map(Chunk::page_number).collect();
        let context = retrieved
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        tracing::info!(top_k = self.config.top_k, ?pages, "Context retrieved");

        Ok(RetrievedContext {
            context,
            chunk_count,
            retrieved: retrieved.len(),
            ocr_pages,
        })
    }

    async fn index_chunks(&self, chunks: Vec<Chunk>) -> Result<(), RagError> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(RagError::Embedding)?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::Embedding(EmbedderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            ))));
        }

        let records = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| chunk.to_record(embedding))
            .collect();

        self.vector_store.index_batch(records).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("vector store: {0}")]
    Storage(#[from] VectorStoreError),
}
