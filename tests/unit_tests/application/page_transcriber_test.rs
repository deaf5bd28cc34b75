use std::sync::Arc;

use docextract::application::ports::OcrError;
use docextract::application::services::{PageTranscriber, TranscriptionError, delimit_pages};

use crate::support::{MockOcrEngine, MockPdfEngine};

fn transcriber(pdf: &Arc<MockPdfEngine>, ocr: &Arc<MockOcrEngine>) -> PageTranscriber {
    PageTranscriber::new(pdf.clone(), ocr.clone(), 200.0, 3)
}

#[tokio::test]
async fn given_pages_out_of_order_when_transcribing_then_results_follow_request_order() {
    let pdf = Arc::new(MockPdfEngine::new(Vec::new()));
    let ocr = Arc::new(MockOcrEngine::new());

    let pages = transcriber(&pdf, &ocr)
        .transcribe(Arc::from(&b"%PDF"[..]), vec![3, 1, 2])
        .await
        .unwrap();

    let numbers: Vec<u32> = pages.iter().map(|(n, _)| *n).collect();
    assert_eq!(numbers, vec![3, 1, 2]);
    assert_eq!(pages[1].1, MockOcrEngine::text_for(1));
    assert_eq!(pdf.rendered_pages(), vec![3, 1, 2]);
    assert_eq!(ocr.calls(), 3);
}

#[tokio::test]
async fn given_no_pages_when_transcribing_then_nothing_is_rendered_or_sent() {
    let pdf = Arc::new(MockPdfEngine::new(Vec::new()));
    let ocr = Arc::new(MockOcrEngine::new());

    let pages = transcriber(&pdf, &ocr)
        .transcribe(Arc::from(&b"%PDF"[..]), Vec::new())
        .await
        .unwrap();

    assert!(pages.is_empty());
    assert_eq!(pdf.render_calls(), 0);
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn given_failing_page_when_transcribing_then_whole_run_fails() {
    let pdf = Arc::new(MockPdfEngine::new(Vec::new()));
    let ocr = Arc::new(MockOcrEngine::failing_on(2));

    let err = transcriber(&pdf, &ocr)
        .transcribe(Arc::from(&b"%PDF"[..]), vec![1, 2, 3])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TranscriptionError::Ocr(OcrError::Upstream { page: 2, status: 503, .. })
    ));
}

#[test]
fn given_transcribed_pages_when_delimiting_then_each_page_has_a_header() {
    let text = delimit_pages(&[(1, " first \n".to_string()), (2, "second".to_string())]);

    assert_eq!(text, "===== PAGE 1 =====\n\nfirst\n\n\n===== PAGE 2 =====\n\nsecond");
}
