use std::sync::Arc;

use docextract::application::services::{
    StructuredExtractionError, StructuredExtractor, build_extraction_prompt,
};
use docextract::domain::{ExtractionSchema, FieldSpec, Table};
use serde_json::json;

use crate::support::MockLlmClient;

fn invoice_schema() -> ExtractionSchema {
    ExtractionSchema::new()
        .with_field("invoice_number", FieldSpec::new("string", "Invoice identifier"))
        .with_field("total", FieldSpec::new("number", "Grand total incl. tax"))
        .with_field("iban", FieldSpec::new("string", "Bank account").disabled())
}

#[test]
fn given_content_and_schema_when_building_prompt_then_sections_appear_in_order() {
    let tables = vec![Table::new(1, vec![vec!["Item".into(), "Amount".into()]])];

    let prompt = build_extraction_prompt(
        "ACME Corp Invoice INV-001",
        &tables,
        "Amounts are in EUR.",
        &invoice_schema(),
    );

    let order = [
        "--- DOCUMENT TEXT ---\nACME Corp Invoice INV-001",
        "--- TABLES FOUND ---\n[{\"page\":1,\"rows\":[[\"Item\",\"Amount\"]]}]",
        "--- EXTRACTION INSTRUCTIONS ---\nAmounts are in EUR.",
        "--- FIELD-SPECIFIC DETAILS ---\n- invoice_number: Invoice identifier\n- total: Grand total incl. tax\n",
        "--- STRICT JSON SCHEMA ---\n{\"invoice_number\":\"string\",\"total\":\"number\"}",
        "1. Output strictly valid JSON.",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|section| prompt.find(section).unwrap_or_else(|| panic!("missing {section}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!prompt.contains("iban"));
}

#[test]
fn given_no_tables_when_building_prompt_then_empty_list_is_rendered() {
    let prompt = build_extraction_prompt("text", &[], "", &invoice_schema());

    assert!(prompt.contains("--- TABLES FOUND ---\n[]\n"));
}

#[tokio::test]
async fn given_fenced_reply_with_nulls_when_extracting_then_clean_object_is_returned() {
    let llm = Arc::new(MockLlmClient::new(
        "```json\n{\"invoice_number\": \"INV-001\", \"total\": null}\n```",
    ));
    let extractor = StructuredExtractor::new(llm.clone());

    let extracted = extractor
        .extract("Invoice INV-001", &[], "", &invoice_schema())
        .await
        .unwrap();

    assert_eq!(serde_json::Value::Object(extracted), json!({"invoice_number": "INV-001"}));
    assert_eq!(llm.calls(), 1);
    assert!(llm.last_prompt().contains("Invoice INV-001"));
}

#[tokio::test]
async fn given_prose_reply_when_extracting_then_malformed() {
    let extractor = StructuredExtractor::new(Arc::new(MockLlmClient::new("Sorry, no data.")));

    let err = extractor
        .extract("text", &[], "", &invoice_schema())
        .await
        .unwrap_err();

    assert!(matches!(err, StructuredExtractionError::Malformed(_)));
}

#[tokio::test]
async fn given_unavailable_model_when_extracting_then_completion_error() {
    let extractor = StructuredExtractor::new(Arc::new(MockLlmClient::unavailable()));

    let err = extractor
        .extract("text", &[], "", &invoice_schema())
        .await
        .unwrap_err();

    assert!(matches!(err, StructuredExtractionError::Completion(_)));
}
