use crate::domain::{PageLayout, Table};

use super::TableDetector;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedContent {
    pub text: String,
    pub tables: Vec<Table>,
}

/// Native text and tables from digitally encoded pages. Makes no calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTableExtractor {
    detector: TableDetector,
}

impl TextTableExtractor {
    pub fn new(detector: TableDetector) -> Self {
        Self { detector }
    }

    pub fn extract(&self, layouts: &[PageLayout]) -> ExtractedContent {
        let text = layouts
            .iter()
            .map(PageLayout::plain_text)
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let tables = layouts
            .iter()
            .flat_map(|layout| self.detector.detect(layout))
            .collect();

        ExtractedContent { text, tables }
    }
}
