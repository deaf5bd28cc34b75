use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qdrant_client::{Payload, Qdrant};
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder,
    Distance, FieldType, Filter, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder, VectorsConfig,
};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    CollectionConfig, PayloadFieldType, RecordFilter, SearchHit, VectorStore,
    VectorStoreError,
};
use crate::domain::{Embedding, IndexStatus, VectorRecord};

const RECORD_ID_KEY: &str = "record_id";

struct Counters {
    indexed_count: u64,
    last_sync: Option<DateTime<Utc>>,
}

/// Qdrant collection with cosine distance. The indexed count starts from the
/// collection's point count at connect time.
pub struct QdrantAdapter {
    client: Qdrant,
    collection_name: String,
    dimensions: u64,
    counters: Mutex<Counters>,
}

impl QdrantAdapter {
    #[instrument(skip(config), fields(url = %url, collection = %config.name))]
    pub async fn connect(url: &str, config: &CollectionConfig) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        let adapter = Self {
            client,
            collection_name: config.name.clone(),
            dimensions: config.vector_dimensions,
            counters: Mutex::new(Counters {
                indexed_count: 0,
                last_sync: None,
            }),
        };

        match adapter.collection_vector_size().await? {
            Some(existing) if existing != config.vector_dimensions => {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: existing as usize,
                    actual: config.vector_dimensions as usize,
                });
            }
            Some(_) => info!("collection_reused"),
            None => adapter.create_collection(config).await?,
        }

        let existing_points = adapter.point_count().await?;
        adapter.counters.lock().await.indexed_count = existing_points;
        Ok(adapter)
    }

    /// Point ids must be UUIDs or integers; other record ids map to a stable v5 UUID.
    pub fn point_id_for(record_id: &str) -> Uuid {
        Uuid::parse_str(record_id)
            .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, record_id.as_bytes()))
    }

    fn map_field_type(field_type: &PayloadFieldType) -> FieldType {
        match field_type {
            PayloadFieldType::Keyword => FieldType::Keyword,
            PayloadFieldType::Integer => FieldType::Integer,
        }
    }

    async fn create_collection(&self, config: &CollectionConfig) -> Result<(), VectorStoreError> {
        let vectors_config = VectorsConfig::from(VectorParamsBuilder::new(
            config.vector_dimensions,
            Distance::Cosine,
        ));

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(vectors_config),
            )
            .await
            .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;
        info!(collection = %self.collection_name, "collection_created");

        for index in &config.payload_indexes {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    &self.collection_name,
                    &index.field_name,
                    Self::map_field_type(&index.field_type),
                ))
                .await
                .map_err(|e| VectorStoreError::PayloadIndexFailed(e.to_string()))?;
            info!(field = %index.field_name, "payload_index_applied");
        }
        Ok(())
    }

    async fn collection_vector_size(&self) -> Result<Option<u64>, VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;
        if !exists {
            return Ok(None);
        }

        let info = self
            .client
            .collection_info(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(info
            .result
            .and_then(|result| result.config)
            .and_then(|config| config.params)
            .and_then(|params| params.vectors_config)
            .and_then(|vectors_config| match vectors_config.config {
                Some(qdrant_client::qdrant::vectors_config::Config::Params(params)) => {
                    Some(params.size)
                }
                _ => None,
            }))
    }

    async fn point_count(&self) -> Result<u64, VectorStoreError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection_name).exact(true))
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;
        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }
}

fn to_json(value: qdrant_client::qdrant::Value) -> Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::from(i),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => Value::Array(list.values.into_iter().map(to_json).collect()),
        Some(Kind::StructValue(fields)) => Value::Object(
            fields
                .fields
                .into_iter()
                .map(|(k, v)| (k, to_json(v)))
                .collect(),
        ),
    }
}

#[async_trait]
impl VectorStore for QdrantAdapter {
    async fn index(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        self.index_batch(vec![record]).await
    }

    #[instrument(skip(self, records), fields(collection = %self.collection_name, count = records.len()))]
    async fn index_batch(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let count = records.len() as u64;

        let points = records
            .into_iter()
            .map(|record| {
                if record.embedding.dimensions() as u64 != self.dimensions {
                    return Err(VectorStoreError::DimensionMismatch {
                        expected: self.dimensions as usize,
                        actual: record.embedding.dimensions(),
                    });
                }
                let mut payload = record.payload;
                payload.insert(RECORD_ID_KEY.to_string(), Value::String(record.id.clone()));

                Ok(PointStruct::new(
                    PointId::from(Self::point_id_for(&record.id).to_string()),
                    record.embedding.values,
                    Payload::from(payload),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

        let mut counters = self.counters.lock().await;
        counters.indexed_count += count;
        counters.last_sync = Some(Utc::now());

        info!(count, "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding, filter), fields(collection = %self.collection_name, top_k = top_k))]
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        let mut request = SearchPointsBuilder::new(
            &self.collection_name,
            embedding.values.clone(),
            top_k as u64,
        )
        .with_payload(true);
        if let Some(filter) = filter {
            request = request.filter(Filter::must([Condition::matches(
                "document_id",
                filter.document_id.clone(),
            )]));
        }

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| {
                let mut payload: Map<String, Value> = point
                    .payload
                    .into_iter()
                    .map(|(k, v)| (k, to_json(v)))
                    .collect();
                let id = match payload.remove(RECORD_ID_KEY) {
                    Some(Value::String(id)) => id,
                    _ => match point.id?.point_id_options? {
                        PointIdOptions::Uuid(uuid) => uuid,
                        PointIdOptions::Num(n) => n.to_string(),
                    },
                };
                Some(SearchHit {
                    id,
                    score: point.score,
                    payload,
                })
            })
            .collect())
    }

    async fn status(&self) -> Result<IndexStatus, VectorStoreError> {
        let counters = self.counters.lock().await;
        Ok(IndexStatus {
            total_indexed: counters.indexed_count,
            last_sync: counters.last_sync,
        })
    }
}
