use docextract::application::services::{strip_null_entries, strip_nulls};
use serde_json::{Value, json};

fn as_map(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn given_nested_nulls_when_stripping_then_null_entries_vanish_at_every_depth() {
    let input = json!({
        "supplier": null,
        "customer": {"name": "Globex", "vat": null},
        "lines": [{"sku": "W-1", "discount": null}, null, 3]
    });

    let stripped = strip_nulls(input);

    assert_eq!(
        stripped,
        json!({
            "customer": {"name": "Globex"},
            "lines": [{"sku": "W-1"}, null, 3]
        })
    );
}

#[test]
fn given_stripped_output_when_stripping_again_then_unchanged() {
    let once = strip_null_entries(as_map(json!({"a": null, "b": {"c": null, "d": [1, null]}})));

    let twice = strip_null_entries(once.clone());

    assert_eq!(once, twice);
}

#[test]
fn given_falsy_values_when_stripping_then_only_null_is_removed() {
    let stripped = strip_null_entries(as_map(json!({"zero": 0, "empty": "", "no": false, "list": []})));

    assert_eq!(stripped.len(), 4);
}
