use super::{PayloadFieldType, PayloadIndex};

#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub name: String,
    pub vector_dimensions: u64,
    pub payload_indexes: Vec<PayloadIndex>,
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>, vector_dimensions: u64) -> Self {
        Self {
            name: name.into(),
            vector_dimensions,
            payload_indexes: vec![
                PayloadIndex {
                    field_name: "document_id".to_string(),
                    field_type: PayloadFieldType::Keyword,
                },
                PayloadIndex {
                    field_name: "filename".to_string(),
                    field_type: PayloadFieldType::Keyword,
                },
                PayloadIndex {
                    field_name: "page_number".to_string(),
                    field_type: PayloadFieldType::Integer,
                },
            ],
        }
    }
}
