use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, DocumentKind};

/// Best-effort UTF-8: invalid byte sequences are dropped, never an error.
pub struct PlainTextAdapter;

impl PlainTextAdapter {
    pub fn decode_lossy(data: &[u8]) -> String {
        data.utf8_chunks().map(|chunk| chunk.valid()).collect()
    }
}

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.kind != DocumentKind::Text {
            return Err(FileLoaderError::UnsupportedKind(document.kind.as_str().to_string()));
        }

        let text = Self::decode_lossy(data);
        if text.len() < data.len() {
            tracing::debug!(dropped = data.len() - text.len(), "Invalid UTF-8 bytes dropped");
        }
        Ok(text)
    }
}
