mod composite_file_loader;
mod docx_adapter;
mod layout_builder;
mod pdfium_engine;
mod plain_text_adapter;
mod vision_ocr_adapter;

pub use composite_file_loader::CompositeFileLoader;
pub use docx_adapter::DocxAdapter;
pub use layout_builder::build_page_layout;
pub use pdfium_engine::PdfiumEngine;
pub use plain_text_adapter::PlainTextAdapter;
pub use vision_ocr_adapter::{OCR_SYSTEM_PROMPT, OCR_USER_PROMPT, VisionOcrAdapter};
