use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, DocumentKind};

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraphs of a `.docx`, one per line. Table contents are skipped.
pub struct DocxAdapter;

impl DocxAdapter {
    fn read_document_part(data: &[u8]) -> Result<String, FileLoaderError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("not a docx archive: {e}")))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("{DOCUMENT_PART}: {e}")))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("{DOCUMENT_PART}: {e}")))?;
        Ok(xml)
    }

    /// Nested paragraphs (text boxes) are emitted after the paragraph that holds them.
    pub fn paragraphs(xml: &str) -> Result<Vec<String>, FileLoaderError> {
        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut open: Vec<String> = Vec::new();
        let mut nested: Vec<String> = Vec::new();
        let mut table_depth = 0usize;
        let mut fallback_depth = 0usize;
        let mut in_text_run = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| FileLoaderError::ExtractionFailed(format!("malformed xml: {e}")))?;

            // `mc:Fallback` repeats the `mc:Choice` content for older readers.
            match event {
                Event::Eof => break,
                Event::Start(e) if e.name().as_ref() == b"mc:Fallback" => fallback_depth += 1,
                Event::End(e) if e.name().as_ref() == b"mc:Fallback" => {
                    fallback_depth = fallback_depth.saturating_sub(1)
                }
                _ if fallback_depth > 0 => {}
                Event::Start(e) => match e.name().as_ref() {
                    b"w:tbl" => table_depth += 1,
                    b"w:p" if table_depth == 0 => open.push(String::new()),
                    b"w:t" => in_text_run = true,
                    _ => {}
                },
                Event::Empty(e) => match (e.name().as_ref(), open.last_mut()) {
                    (b"w:tab", Some(paragraph)) => paragraph.push('\t'),
                    (b"w:br" | b"w:cr", Some(paragraph)) => paragraph.push('\n'),
                    (b"w:p", None) if table_depth == 0 => paragraphs.push(String::new()),
                    _ => {}
                },
                Event::Text(t) if in_text_run => {
                    if let Some(paragraph) = open.last_mut() {
                        let text = t.unescape().map_err(|e| {
                            FileLoaderError::ExtractionFailed(format!("bad text run: {e}"))
                        })?;
                        paragraph.push_str(&text);
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                    b"w:p" if table_depth == 0 => {
                        if let Some(paragraph) = open.pop() {
                            if open.is_empty() {
                                paragraphs.push(paragraph);
                                paragraphs.append(&mut nested);
                            } else {
                                nested.push(paragraph);
                            }
                        }
                    }
                    b"w:t" => in_text_run = false,
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(skip(self, data), fields(document_id = %document.id, filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.kind != DocumentKind::Docx {
            return Err(FileLoaderError::UnsupportedKind(document.kind.as_str().to_string()));
        }

        let xml = Self::read_document_part(data)?;
        let paragraphs = Self::paragraphs(&xml)?;
        tracing::debug!(paragraphs = paragraphs.len(), "DOCX paragraphs read");
        Ok(paragraphs.join("\n"))
    }
}
