use async_trait::async_trait;

use crate::domain::Document;

/// Text extraction for formats that need no layout analysis.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported document kind: {0}")]
    UnsupportedKind(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}
