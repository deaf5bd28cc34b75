use serde_json::{Map, Value};

/// Restricts a search to records whose payload `document_id` matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub document_id: String,
}

impl RecordFilter {
    pub fn document(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
        }
    }

    pub fn matches(&self, payload: &Map<String, Value>) -> bool {
        payload.get("document_id").and_then(Value::as_str) == Some(self.document_id.as_str())
    }
}
