use docextract::application::services::{DocumentClassifier, PdfRoute, Route};

use crate::support::{scanned_page, text_page};

#[test]
fn given_supported_inputs_when_routing_then_each_kind_has_its_route() {
    let classifier = DocumentClassifier::default();

    assert_eq!(classifier.route("image/png", "scan.png"), Some(Route::ImageOcr));
    assert_eq!(
        classifier.route("application/octet-stream", "contract.docx"),
        Some(Route::DocxText)
    );
    assert_eq!(classifier.route("text/plain", "notes.txt"), Some(Route::PlainText));
    assert_eq!(classifier.route("application/pdf", "invoice.pdf"), Some(Route::Pdf));
}

#[test]
fn given_unsupported_input_when_routing_then_none() {
    let classifier = DocumentClassifier::default();

    assert_eq!(classifier.route("application/octet-stream", "setup.exe"), None);
}

#[test]
fn given_short_pdf_with_native_text_when_routing_then_direct() {
    let classifier = DocumentClassifier::default();
    let layouts = vec![
        scanned_page(1),
        text_page(2, &["Invoice INV-001 issued 2024-03-01"]),
        scanned_page(3),
    ];

    assert_eq!(classifier.route_pdf(&layouts), PdfRoute::Direct);
}

#[test]
fn given_pdf_over_page_threshold_when_routing_then_large_even_with_text() {
    let classifier = DocumentClassifier::default();
    let layouts: Vec<_> = (1..=6)
        .map(|n| text_page(n, &["Plenty of native text on this page"]))
        .collect();

    assert_eq!(classifier.route_pdf(&layouts), PdfRoute::Large);
}

#[test]
fn given_pdf_at_page_threshold_when_routing_then_threshold_is_inclusive_for_direct() {
    let classifier = DocumentClassifier::default();
    let layouts: Vec<_> = (1..=5)
        .map(|n| text_page(n, &["Plenty of native text on this page"]))
        .collect();

    assert_eq!(classifier.route_pdf(&layouts), PdfRoute::Direct);
}

#[test]
fn given_short_pdf_without_meaningful_text_when_routing_then_large() {
    let classifier = DocumentClassifier::default();
    let layouts = vec![scanned_page(1), text_page(2, &["p. 2"])];

    assert_eq!(classifier.route_pdf(&layouts), PdfRoute::Large);
}

#[test]
fn given_text_at_minimum_length_when_checking_meaning_then_it_counts() {
    let classifier = DocumentClassifier::new(5, 10);

    assert!(classifier.has_meaningful_text("  0123456789  "));
    assert!(!classifier.has_meaningful_text("012345678"));
    assert_eq!(classifier.min_meaningful_text_chars(), 10);
}
