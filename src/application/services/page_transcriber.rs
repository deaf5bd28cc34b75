use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};

use crate::application::ports::{DocumentReadError, OcrEngine, OcrError, PdfEngine};

/// Renders PDF pages and sends them through OCR with bounded concurrency.
#[derive(Clone)]
pub struct PageTranscriber {
    pdf_engine: Arc<dyn PdfEngine>,
    ocr_engine: Arc<dyn OcrEngine>,
    render_dpi: f32,
    page_concurrency: usize,
}

impl PageTranscriber {
    pub fn new(
        pdf_engine: Arc<dyn PdfEngine>,
        ocr_engine: Arc<dyn OcrEngine>,
        render_dpi: f32,
        page_concurrency: usize,
    ) -> Self {
        Self {
            pdf_engine,
            ocr_engine,
            render_dpi,
            page_concurrency: page_concurrency.max(1),
        }
    }

    /// Returns `(page_number, text)` in the order requested. The first failing page
    /// aborts the whole run.
    #[tracing::instrument(skip(self, data), fields(pages = page_numbers.len()))]
    pub async fn transcribe(
        &self,
        data: Arc<[u8]>,
        page_numbers: Vec<u32>,
    ) -> Result<Vec<(u32, String)>, TranscriptionError> {
        if page_numbers.is_empty() {
            return Ok(Vec::new());
        }

        let engine = Arc::clone(&self.pdf_engine);
        let dpi = self.render_dpi;
        let pages = tokio::task::spawn_blocking(move || engine.render_pages(&data, &page_numbers, dpi))
            .await
            .map_err(|e| DocumentReadError::TaskJoin(e.to_string()))??;

        let ocr = &self.ocr_engine;
        let transcribed = stream::iter(pages)
            .map(|page| async move {
                let png = page.image.ok_or_else(|| DocumentReadError::Page {
                    page: page.number,
                    reason: "page was not rendered".to_string(),
                })?;
                let text = ocr.transcribe_page(&png, page.number).await?;
                tracing::debug!(page = page.number, chars = text.len(), "Page transcribed");
                Ok::<_, TranscriptionError>((page.number, text))
            })
            .buffered(self.page_concurrency)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(transcribed)
    }
}

/// `===== PAGE n =====` blocks in page order, separated by two blank lines.
pub fn delimit_pages(pages: &[(u32, String)]) -> String {
    pages
        .iter()
        .map(|(number, text)| format!("===== PAGE {number} =====\n\n{}", text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n\n")
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("rendering: {0}")]
    Render(#[from] DocumentReadError),
    #[error("ocr: {0}")]
    Ocr(#[from] OcrError),
}
