use std::path::Path;

use super::chunk::DocumentId;

/// A document submitted for extraction. Lives for the duration of one extraction call.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub content_type: String,
    pub kind: DocumentKind,
    pub source_path: Option<String>,
    pub size_bytes: u64,
    pub page_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Image,
    Docx,
    Text,
    Pdf,
}

impl DocumentKind {
    /// Content-type wins for images; the extension decides everything else.
    pub fn detect(content_type: &str, filename: &str) -> Option<Self> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("image/") {
            return Some(Self::Image);
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("docx") => Some(Self::Docx),
            Some("txt") => Some(Self::Text),
            Some("pdf") => Some(Self::Pdf),
            _ if content_type == "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Docx => "docx",
            Self::Text => "text",
            Self::Pdf => "pdf",
        }
    }
}

impl Document {
    pub fn new(filename: String, content_type: String, kind: DocumentKind, size_bytes: u64) -> Self {
        Self {
            id: DocumentId::new(),
            filename,
            content_type,
            kind,
            source_path: None,
            size_bytes,
            page_count: None,
        }
    }

    pub fn with_source_path(mut self, source_path: impl Into<String>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }

    pub fn source_path_or_filename(&self) -> &str {
        self.source_path.as_deref().unwrap_or(&self.filename)
    }
}
