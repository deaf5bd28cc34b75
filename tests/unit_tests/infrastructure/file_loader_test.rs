use docextract::application::ports::{FileLoader, FileLoaderError};
use docextract::domain::{Document, DocumentKind};
use docextract::infrastructure::text_processing::{CompositeFileLoader, PlainTextAdapter};

fn document(kind: DocumentKind) -> Document {
    Document::new("input".to_string(), "text/plain".to_string(), kind, 0)
}

#[test]
fn given_invalid_utf8_when_decoding_then_bad_bytes_are_dropped() {
    let decoded = PlainTextAdapter::decode_lossy(b"caf\xc3\xa9 \xff\xfeok");

    assert_eq!(decoded, "café ok");
}

#[tokio::test]
async fn given_text_document_when_loading_through_composite_then_plain_text_adapter_answers() {
    let text = CompositeFileLoader::default()
        .extract_text(b"Invoice INV-9", &document(DocumentKind::Text))
        .await
        .unwrap();

    assert_eq!(text, "Invoice INV-9");
}

#[tokio::test]
async fn given_kind_without_loader_when_loading_then_unsupported_kind() {
    let err = CompositeFileLoader::default()
        .extract_text(b"%PDF", &document(DocumentKind::Pdf))
        .await
        .unwrap_err();

    assert!(matches!(err, FileLoaderError::UnsupportedKind(kind) if kind == "pdf"));
}

#[tokio::test]
async fn given_docx_kind_with_text_bytes_when_loading_then_docx_adapter_rejects_it() {
    let err = CompositeFileLoader::default()
        .extract_text(b"not a zip", &document(DocumentKind::Docx))
        .await
        .unwrap_err();

    assert!(matches!(err, FileLoaderError::ExtractionFailed(_)));
}
