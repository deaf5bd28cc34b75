use crate::domain::{Page, PageLayout};

/// Blocking PDF access. Callers run these on the blocking pool.
pub trait PdfEngine: Send + Sync {
    /// Native text layout of every page, in page order.
    fn read_layout(&self, data: &[u8]) -> Result<Vec<PageLayout>, DocumentReadError>;

    /// Renders the requested 1-based pages to PNG, returned in the order requested.
    fn render_pages(
        &self,
        data: &[u8],
        page_numbers: &[u32],
        dpi: f32,
    ) -> Result<Vec<Page>, DocumentReadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentReadError {
    #[error("pdf engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("page {page}: {reason}")]
    Page { page: u32, reason: String },
    #[error("image encoding failed: {0}")]
    ImageEncoding(String),
    #[error("blocking task failed: {0}")]
    TaskJoin(String),
}
