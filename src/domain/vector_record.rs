use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::Embedding;

#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Embedding,
    pub payload: Map<String, Value>,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            id: id.into(),
            embedding,
            payload: Map::new(),
        }
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStatus {
    pub total_indexed: u64,
    pub last_sync: Option<DateTime<Utc>>,
}
