use serde_json::{Map, Value};

/// Drops null-valued object entries at every depth. Nulls inside arrays stay.
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(strip_null_entries(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        scalar => scalar,
    }
}

pub fn strip_null_entries(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k, strip_nulls(v)))
        .collect()
}
