use std::io::Cursor;
use std::time::Duration;

use docextract::application::ports::{OcrEngine, OcrError};
use docextract::infrastructure::llm::ChatEndpoint;
use docextract::infrastructure::text_processing::{
    OCR_SYSTEM_PROMPT, OCR_USER_PROMPT, VisionOcrAdapter,
};
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::support::start_mock_server;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn endpoint(base_url: &str) -> ChatEndpoint {
    ChatEndpoint {
        base_url: base_url.to_string(),
        api_key: "ocr-key".to_string(),
        model: "vision-model".to_string(),
        temperature: 0.1,
        max_tokens: 4096,
        timeout: Duration::from_secs(5),
    }
}

fn fake_png() -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(b"rest-of-image");
    bytes
}

#[tokio::test]
async fn given_page_image_when_transcribing_then_vision_request_carries_prompts_and_data_url() {
    let server = start_mock_server(
        "/chat/completions",
        200,
        r##"{"choices":[{"message":{"content":"# Invoice\n| Item | Amount |"}}]}"##,
    )
    .await;
    let adapter = VisionOcrAdapter::new(endpoint(&server.base_url)).unwrap();

    let text = adapter.transcribe_page(&fake_png(), 1).await.unwrap();

    assert_eq!(text, "# Invoice\n| Item | Amount |");
    let requests = server.requests();
    let body = &requests[0].body;
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer ocr-key"));
    assert_eq!(body["model"], "vision-model");
    assert_eq!(body["messages"][0]["content"], OCR_SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["content"][0]["type"], "text");
    assert_eq!(body["messages"][1]["content"][0]["text"], OCR_USER_PROMPT);
    let url = body["messages"][1]["content"][1]["image_url"]["url"]
        .as_str()
        .unwrap();
    assert!(url.starts_with("data:image/png;base64,iVBORw0KGg"));
    assert!(body.get("response_format").is_none());
}

#[tokio::test]
async fn given_provider_outage_when_transcribing_then_upstream_error_names_the_page() {
    let server = start_mock_server("/chat/completions", 503, r#"{"error":"overloaded"}"#).await;
    let adapter = VisionOcrAdapter::new(endpoint(&server.base_url)).unwrap();

    let err = adapter.transcribe_page(&fake_png(), 4).await.unwrap_err();

    assert!(matches!(err, OcrError::Upstream { page: 4, status: 503, .. }));
}

#[tokio::test]
async fn given_reply_without_content_when_transcribing_then_missing_completion() {
    let server = start_mock_server(
        "/chat/completions",
        200,
        r#"{"choices":[{"message":{"content":null}}]}"#,
    )
    .await;
    let adapter = VisionOcrAdapter::new(endpoint(&server.base_url)).unwrap();

    let err = adapter.transcribe_page(&fake_png(), 2).await.unwrap_err();

    assert!(matches!(err, OcrError::MissingCompletion { page: 2, .. }));
}

#[test]
fn given_jpeg_when_ensuring_png_then_it_is_re_encoded() {
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(4, 4))
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .unwrap();

    let png = VisionOcrAdapter::ensure_png(&jpeg).unwrap();

    assert!(png.starts_with(PNG_SIGNATURE));
}

#[test]
fn given_bytes_that_are_not_an_image_when_ensuring_png_then_image_encoding_error() {
    let err = VisionOcrAdapter::ensure_png(b"definitely not an image").unwrap_err();

    assert!(matches!(err, OcrError::ImageEncoding(_)));
}
