use std::fmt;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Embedding, VectorRecord};

/// One retrievable unit of text. Chunks are page-granular: a page yields at most one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMetadata {
    pub document_id: DocumentId,
    pub filename: String,
    pub page_number: u32,
    pub source_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(Uuid);

impl ChunkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ChunkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Chunk {
    pub fn new(text: String, metadata: ChunkMetadata) -> Self {
        Self {
            id: ChunkId::new(),
            text,
            metadata,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.metadata.page_number
    }

    /// Payload stored next to the vector so the chunk can be rebuilt from a search hit.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(
            "document_id".to_string(),
            Value::String(self.metadata.document_id.to_string()),
        );
        payload.insert(
            "filename".to_string(),
            Value::String(self.metadata.filename.clone()),
        );
        payload.insert(
            "page_number".to_string(),
            Value::Number(self.metadata.page_number.into()),
        );
        payload.insert(
            "source_path".to_string(),
            Value::String(self.metadata.source_path.clone()),
        );
        payload.insert("text".to_string(), Value::String(self.text.clone()));
        payload
    }

    pub fn to_record(&self, embedding: Embedding) -> VectorRecord {
        VectorRecord::new(self.id.to_string(), embedding).with_payload(self.to_payload())
    }

    pub fn from_payload(id: &str, payload: &Map<String, Value>) -> Option<Self> {
        let id = Uuid::parse_str(id).ok()?;
        let document_id = Uuid::parse_str(payload.get("document_id")?.as_str()?).ok()?;
        let page_number = u32::try_from(payload.get("page_number")?.as_u64()?).ok()?;

        Some(Self {
            id: ChunkId::from_uuid(id),
            text: payload.get("text")?.as_str()?.to_string(),
            metadata: ChunkMetadata {
                document_id: DocumentId::from_uuid(document_id),
                filename: payload
                    .get("filename")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                page_number,
                source_path: payload
                    .get("source_path")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
        })
    }
}
