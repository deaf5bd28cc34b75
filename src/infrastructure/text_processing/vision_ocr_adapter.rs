use std::io::Cursor;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;
use reqwest::Client;
use serde_json::{Value, json};

use crate::application::ports::{OcrEngine, OcrError};
use crate::infrastructure::llm::{
    ChatCallError, ChatEndpoint, ChatRequest, ChatRequestMessage, ProviderConfigError,
    post_chat_completion,
};

pub const OCR_SYSTEM_PROMPT: &str = "You are a document OCR assistant. Convert the input image into structured text.\n\
Rules:\n\
1. Preserve layout as much as possible:\n   \
- Keep section headings and subheadings\n   \
- Maintain bullet/numbered lists\n   \
- Represent tables as Markdown tables\n   \
- Keep label: value pairs on the same line.\n\
2. Do not summarize or invent content.\n\
3. If some text is unreadable, write [UNREADABLE].";

pub const OCR_USER_PROMPT: &str = "Convert this document page image into structured text while \
preserving headings, tables (as markdown), and lists.";

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Page transcription through a vision-capable chat-completion model.
pub struct VisionOcrAdapter {
    client: Client,
    endpoint: ChatEndpoint,
}

impl VisionOcrAdapter {
    pub fn new(endpoint: ChatEndpoint) -> Result<Self, ProviderConfigError> {
        Ok(Self {
            client: endpoint.build_client("ocr")?,
            endpoint,
        })
    }

    /// PNG bytes pass through; any other format the `image` crate reads is re-encoded.
    pub fn ensure_png(image: &[u8]) -> Result<Vec<u8>, OcrError> {
        if image.starts_with(PNG_SIGNATURE) {
            return Ok(image.to_vec());
        }
        let decoded =
            image::load_from_memory(image).map_err(|e| OcrError::ImageEncoding(e.to_string()))?;
        let mut png = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| OcrError::ImageEncoding(e.to_string()))?;
        Ok(png)
    }
}

#[async_trait]
impl OcrEngine for VisionOcrAdapter {
    #[tracing::instrument(skip(self, png), fields(model = %self.endpoint.model, bytes = png.len()))]
    async fn transcribe_page(&self, png: &[u8], page_number: u32) -> Result<String, OcrError> {
        let png = Self::ensure_png(png)?;
        let data_url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&png)
        );

        let request = ChatRequest {
            model: &self.endpoint.model,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: Value::String(OCR_SYSTEM_PROMPT.to_string()),
                },
                ChatRequestMessage {
                    role: "user",
                    content: json!([
                        { "type": "text", "text": OCR_USER_PROMPT },
                        { "type": "image_url", "image_url": { "url": data_url } }
                    ]),
                },
            ],
            temperature: self.endpoint.temperature,
            max_tokens: self.endpoint.max_tokens,
            response_format: None,
        };

        let text = post_chat_completion(&self.client, &self.endpoint, &request)
            .await
            .map_err(|e| match e {
                ChatCallError::Transport(reason) => OcrError::Transport {
                    page: page_number,
                    reason,
                },
                ChatCallError::Upstream { status, body } => OcrError::Upstream {
                    page: page_number,
                    status,
                    body,
                },
                ChatCallError::MissingContent(reason) => OcrError::MissingCompletion {
                    page: page_number,
                    reason,
                },
            })?;

        tracing::debug!(chars = text.len(), "Page OCR complete");
        Ok(text)
    }
}
