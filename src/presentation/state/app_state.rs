use std::sync::Arc;

use crate::application::ports::{
    Embedder, FileLoader, LlmClient, OcrEngine, PdfEngine, VectorStore,
};
use crate::application::services::{
    ExtractionPipeline, PageTranscriber, RagRetriever, StructuredExtractor, TextTableExtractor,
};
use crate::infrastructure::llm::{EmbedderFactory, OpenAiClient, SharedEmbedder};
use crate::infrastructure::persistence::VectorStoreManager;
use crate::infrastructure::text_processing::{
    CompositeFileLoader, PdfiumEngine, VisionOcrAdapter,
};
use crate::presentation::config::Settings;

/// Long-lived collaborators shared by every command.
pub struct AppState {
    pub settings: Settings,
    pub pipeline: Arc<ExtractionPipeline>,
    pub vector_store: Arc<VectorStoreManager>,
    pub embedder: Arc<SharedEmbedder>,
}

impl AppState {
    /// Validates provider settings, connects the vector store and wires the pipeline.
    /// The embedding model itself loads on first use.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let ocr_engine: Arc<dyn OcrEngine> = Arc::new(VisionOcrAdapter::new(settings.ocr_endpoint())?);
        let llm_client: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(
            settings.llm_endpoint(),
            settings.llm.json_response_format,
        )?);

        let embedder_settings = settings.embedder_settings();
        EmbedderFactory::validate(&embedder_settings)?;
        let embedder = Arc::new(SharedEmbedder::new(embedder_settings));

        let vector_store = Arc::new(VectorStoreManager::new());
        vector_store.connect(&settings.vector_store_config()).await?;

        let pdfium = PdfiumEngine::new(settings.pipeline.pdfium_library_dir.clone());
        if let Err(e) = pdfium.probe() {
            tracing::warn!(error = %e, "PDF engine unavailable, PDF inputs will fail");
        }
        let pdf_engine: Arc<dyn PdfEngine> = Arc::new(pdfium);
        let file_loader: Arc<dyn FileLoader> = Arc::new(CompositeFileLoader::default());

        let pipeline = Self::assemble(
            &settings,
            file_loader,
            pdf_engine,
            ocr_engine,
            llm_client,
            Arc::clone(&embedder) as Arc<dyn Embedder>,
            Arc::clone(&vector_store) as Arc<dyn VectorStore>,
        );

        Ok(Self {
            settings,
            pipeline: Arc::new(pipeline),
            vector_store,
            embedder,
        })
    }

    /// Wires a pipeline from explicit ports.
    pub fn assemble(
        settings: &Settings,
        file_loader: Arc<dyn FileLoader>,
        pdf_engine: Arc<dyn PdfEngine>,
        ocr_engine: Arc<dyn OcrEngine>,
        llm_client: Arc<dyn LlmClient>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> ExtractionPipeline {
        let transcriber = PageTranscriber::new(
            Arc::clone(&pdf_engine),
            Arc::clone(&ocr_engine),
            settings.pipeline.render_dpi,
            settings.pipeline.page_concurrency,
        );
        let rag = RagRetriever::new(
            transcriber.clone(),
            embedder,
            vector_store,
            settings.rag_config(),
        );

        ExtractionPipeline::new(
            settings.pipeline.classifier(),
            file_loader,
            pdf_engine,
            ocr_engine,
            transcriber,
            TextTableExtractor::default(),
            rag,
            StructuredExtractor::new(llm_client),
            settings.pipeline.rag_enabled,
        )
    }

    pub async fn shutdown(&self) {
        self.embedder.teardown().await;
    }
}
