use std::io::Cursor;
use std::path::PathBuf;

use image::ImageFormat;
use pdfium_render::prelude::*;

use super::layout_builder::build_page_layout;
use crate::application::ports::{DocumentReadError, PdfEngine};
use crate::domain::{Bounds, Page, PageLayout, TextSpan};

const POINTS_PER_INCH: f32 = 72.0;

/// PDF access through the pdfium shared library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumEngine {
    library_dir: Option<PathBuf>,
}

impl PdfiumEngine {
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self { library_dir }
    }

    fn bind(&self) -> Result<Pdfium, DocumentReadError> {
        let bindings = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .or_else(|_| Pdfium::bind_to_system_library()),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| DocumentReadError::EngineUnavailable(e.to_string()))?;
        Ok(Pdfium::new(bindings))
    }

    /// Fails with `EngineUnavailable` when the library cannot be loaded.
    pub fn probe(&self) -> Result<(), DocumentReadError> {
        self.bind().map(|_| ())
    }
}

impl PdfEngine for PdfiumEngine {
    fn read_layout(&self, data: &[u8]) -> Result<Vec<PageLayout>, DocumentReadError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| DocumentReadError::Open(e.to_string()))?;

        let mut layouts = Vec::with_capacity(document.pages().len() as usize);
        for (index, page) in document.pages().iter().enumerate() {
            let number = index as u32 + 1;
            let text = page.text().map_err(|e| DocumentReadError::Page {
                page: number,
                reason: e.to_string(),
            })?;

            let spans = text
                .segments()
                .iter()
                .map(|segment| {
                    let rect = segment.bounds();
                    TextSpan::new(
                        segment.text(),
                        Bounds::new(
                            rect.left().value,
                            rect.bottom().value,
                            rect.right().value,
                            rect.top().value,
                        ),
                    )
                })
                .collect();

            layouts.push(build_page_layout(
                number,
                page.width().value,
                page.height().value,
                spans,
            ));
        }

        tracing::debug!(page_count = layouts.len(), "PDF layout read");
        Ok(layouts)
    }

    fn render_pages(
        &self,
        data: &[u8],
        page_numbers: &[u32],
        dpi: f32,
    ) -> Result<Vec<Page>, DocumentReadError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| DocumentReadError::Open(e.to_string()))?;
        let scale = dpi / POINTS_PER_INCH;

        page_numbers
            .iter()
            .map(|&number| {
                let page_error = |reason: String| DocumentReadError::Page { page: number, reason };
                let index = u16::try_from(number.saturating_sub(1))
                    .map_err(|_| page_error("page index out of range".to_string()))?;
                let page = document
                    .pages()
                    .get(index)
                    .map_err(|e| page_error(e.to_string()))?;

                let bitmap = page
                    .render_with_config(
                        &PdfRenderConfig::new()
                            .set_target_width((page.width().value * scale) as i32)
                            .set_target_height((page.height().value * scale) as i32),
                    )
                    .map_err(|e| page_error(e.to_string()))?;

                let mut png = Vec::new();
                bitmap
                    .as_image()
                    .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                    .map_err(|e| DocumentReadError::ImageEncoding(format!("page {number}: {e}")))?;

                Ok(Page::new(number).with_image(png))
            })
            .collect()
    }
}
