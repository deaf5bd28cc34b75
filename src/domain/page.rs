/// A single page of a document. Numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub number: u32,
    pub text: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl Page {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_image(mut self, png: Vec<u8>) -> Self {
        self.image = Some(png);
        self
    }

    /// Character count of the trimmed text, zero when there is none.
    pub fn meaningful_len(&self) -> usize {
        self.text
            .as_deref()
            .map(|t| t.trim().chars().count())
            .unwrap_or(0)
    }
}
