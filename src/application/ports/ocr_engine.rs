use async_trait::async_trait;

/// Vision transcription of a single page image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn transcribe_page(&self, png: &[u8], page_number: u32) -> Result<String, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr request for page {page} failed: {reason}")]
    Transport { page: u32, reason: String },
    #[error("ocr provider returned {status} for page {page}: {body}")]
    Upstream { page: u32, status: u16, body: String },
    #[error("ocr response for page {page} has no completion: {reason}")]
    MissingCompletion { page: u32, reason: String },
    #[error("image could not be prepared for ocr: {0}")]
    ImageEncoding(String),
}
