use serde_json::{Map, Value};

use crate::domain::Chunk;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    /// Higher is closer. Only comparable between hits of the same backend.
    pub score: f32,
    pub payload: Map<String, Value>,
}

impl SearchHit {
    pub fn to_chunk(&self) -> Option<Chunk> {
        Chunk::from_payload(&self.id, &self.payload)
    }
}
