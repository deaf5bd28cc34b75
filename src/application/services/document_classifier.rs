use crate::domain::{DocumentKind, PageLayout};

/// Where a document's text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ImageOcr,
    DocxText,
    PlainText,
    Pdf,
}

/// Decision for a PDF once its pages have been probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfRoute {
    /// Small and digitally encoded: native text and tables, no OCR.
    Direct,
    /// Too many pages, or no page carries meaningful native text.
    Large,
}

#[derive(Debug, Clone, Copy)]
pub struct DocumentClassifier {
    large_document_page_threshold: u32,
    min_meaningful_text_chars: usize,
}

impl DocumentClassifier {
    pub fn new(large_document_page_threshold: u32, min_meaningful_text_chars: usize) -> Self {
        Self {
            large_document_page_threshold,
            min_meaningful_text_chars,
        }
    }

    pub fn min_meaningful_text_chars(&self) -> usize {
        self.min_meaningful_text_chars
    }

    /// `None` for anything the pipeline cannot read.
    pub fn route(&self, content_type: &str, filename: &str) -> Option<Route> {
        DocumentKind::detect(content_type, filename).map(|kind| match kind {
            DocumentKind::Image => Route::ImageOcr,
            DocumentKind::Docx => Route::DocxText,
            DocumentKind::Text => Route::PlainText,
            DocumentKind::Pdf => Route::Pdf,
        })
    }

    pub fn route_pdf(&self, layouts: &[PageLayout]) -> PdfRoute {
        let page_count = u32::try_from(layouts.len()).unwrap_or(u32::MAX);
        if page_count > self.large_document_page_threshold {
            return PdfRoute::Large;
        }

        if layouts.iter().any(|layout| self.has_meaningful_text(&layout.plain_text())) {
            PdfRoute::Direct
        } else {
            PdfRoute::Large
        }
    }

    pub fn has_meaningful_text(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.min_meaningful_text_chars
    }
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new(5, 10)
    }
}
