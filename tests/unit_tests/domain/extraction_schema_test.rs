use docextract::domain::{ExtractionSchema, FieldSpec};
use serde_json::json;

#[test]
fn given_schema_json_when_deserializing_then_declaration_order_is_kept() {
    let raw = r#"{
        "supplier": {"type": "string", "prompt": "Legal name of the seller"},
        "invoice_number": {"type": "string", "prompt": "Invoice identifier"},
        "total": {"type": "number", "prompt": "Grand total"}
    }"#;

    let schema: ExtractionSchema = serde_json::from_str(raw).unwrap();

    let names: Vec<&str> = schema.enabled_fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["supplier", "invoice_number", "total"]);
}

#[test]
fn given_field_without_type_or_enabled_when_deserializing_then_defaults_apply() {
    let schema: ExtractionSchema =
        serde_json::from_str(r#"{"notes": {"prompt": "Free-text remarks"}}"#).unwrap();

    let spec = schema.get("notes").unwrap();
    assert_eq!(spec.field_type, "string");
    assert!(spec.enabled);
}

#[test]
fn given_disabled_field_when_building_target_schema_then_field_is_omitted() {
    let schema = ExtractionSchema::new()
        .with_field("invoice_number", FieldSpec::new("string", "Invoice identifier"))
        .with_field("iban", FieldSpec::new("string", "Bank account").disabled())
        .with_field("total", FieldSpec::new("number", "Grand total"));

    assert_eq!(
        serde_json::Value::Object(schema.target_schema()),
        json!({"invoice_number": "string", "total": "number"})
    );
    assert_eq!(
        schema.field_instructions(),
        "- invoice_number: Invoice identifier\n- total: Grand total\n"
    );
    assert_eq!(schema.len(), 3);
}

#[test]
fn given_existing_field_when_inserting_again_then_it_is_replaced_in_place() {
    let mut schema = ExtractionSchema::new()
        .with_field("a", FieldSpec::new("string", "first"))
        .with_field("b", FieldSpec::new("string", "second"));

    schema.insert("a", FieldSpec::new("number", "replaced"));

    let fields: Vec<(&str, &str)> = schema
        .enabled_fields()
        .map(|(name, spec)| (name, spec.prompt.as_str()))
        .collect();
    assert_eq!(fields, vec![("a", "replaced"), ("b", "second")]);
}

#[test]
fn given_field_that_is_not_an_object_when_deserializing_then_error_names_the_field() {
    let err = serde_json::from_str::<ExtractionSchema>(r#"{"total": 42}"#).unwrap_err();

    assert!(err.to_string().contains("total"));
}
