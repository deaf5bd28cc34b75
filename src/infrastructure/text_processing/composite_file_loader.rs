use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DocxAdapter, PlainTextAdapter};
use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, DocumentKind};

/// Routes each document to the loader registered for its kind.
pub struct CompositeFileLoader {
    adapters: HashMap<DocumentKind, Arc<dyn FileLoader>>,
}

impl CompositeFileLoader {
    pub fn new(adapters: Vec<(DocumentKind, Arc<dyn FileLoader>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }
}

impl Default for CompositeFileLoader {
    fn default() -> Self {
        Self::new(vec![
            (DocumentKind::Docx, Arc::new(DocxAdapter) as Arc<dyn FileLoader>),
            (DocumentKind::Text, Arc::new(PlainTextAdapter)),
        ])
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        let adapter = self
            .adapters
            .get(&document.kind)
            .ok_or_else(|| FileLoaderError::UnsupportedKind(document.kind.as_str().to_string()))?;

        adapter.extract_text(data, document).await
    }
}
