use docextract::application::services::{
    MalformedOutput, parse_brace_span, repair_json, strip_code_fences,
};
use serde_json::json;

#[test]
fn given_fenced_json_when_stripping_then_fences_and_language_tag_go() {
    assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    assert_eq!(strip_code_fences("  ```\n{\"a\": 1}```  "), "{\"a\": 1}");
    assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
}

#[test]
fn given_clean_json_when_repairing_then_parsed_as_is() {
    let repaired = repair_json(r#"{"invoice_number": "INV-1", "total": 71.0}"#).unwrap();

    assert_eq!(
        serde_json::Value::Object(repaired),
        json!({"invoice_number": "INV-1", "total": 71.0})
    );
}

#[test]
fn given_chatter_around_fenced_json_when_repairing_then_brace_span_is_used() {
    let raw = "Here is the result:\n```json\n{\"a\": 1, \"b\": null}\n```";

    let repaired = repair_json(raw).unwrap();

    assert_eq!(serde_json::Value::Object(repaired), json!({"a": 1, "b": null}));
}

#[test]
fn given_trailing_explanation_when_repairing_then_object_is_recovered() {
    let raw = "{\"total\": 12.5} I hope this helps! Let me know.";

    let repaired = repair_json(raw).unwrap();

    assert_eq!(repaired["total"], 12.5);
}

#[test]
fn given_no_json_when_repairing_then_unparseable() {
    let err = repair_json("I could not find any invoice data.").unwrap_err();

    assert!(matches!(err, MalformedOutput::Unparseable(_)));
}

#[test]
fn given_json_array_when_repairing_then_not_an_object() {
    let err = repair_json("[1, 2, 3]").unwrap_err();

    assert!(matches!(err, MalformedOutput::NotAnObject(_)));
}

#[test]
fn given_reversed_braces_when_parsing_brace_span_then_none() {
    assert!(parse_brace_span("} nothing here {").is_none());
    assert!(parse_brace_span("no braces").is_none());
}
