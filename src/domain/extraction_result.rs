use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Success,
}

/// How the text handed to the model was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    ImageOcr,
    DocxText,
    PlainText,
    PdfDirect,
    PdfRetrieval,
    PdfFullOcr,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImageOcr => "image_ocr",
            Self::DocxText => "docx_text",
            Self::PlainText => "plain_text",
            Self::PdfDirect => "pdf_direct",
            Self::PdfRetrieval => "pdf_retrieval",
            Self::PdfFullOcr => "pdf_full_ocr",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub document_id: String,
    pub status: ExtractionStatus,
    pub strategy: ExtractionStrategy,
    pub page_count: Option<u32>,
    pub extracted_data: Map<String, Value>,
    pub schema_used: Map<String, Value>,
    pub tables: Vec<Table>,
}
