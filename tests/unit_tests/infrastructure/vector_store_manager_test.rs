use std::sync::Arc;

use docextract::application::ports::{
    CollectionConfig, PayloadFieldType, VectorProvider, VectorStore, VectorStoreError,
};
use docextract::domain::{Embedding, VectorRecord};
use docextract::infrastructure::persistence::{
    FlatVectorStore, QdrantAdapter, VectorStoreConfig, VectorStoreManager,
};

#[test]
fn given_provider_tags_when_parsing_then_aliases_map_to_backends() {
    assert_eq!("flat".parse::<VectorProvider>().unwrap(), VectorProvider::Flat);
    assert_eq!("FAISS".parse::<VectorProvider>().unwrap(), VectorProvider::Flat);
    assert_eq!("chroma".parse::<VectorProvider>().unwrap(), VectorProvider::Sqlite);
    assert_eq!(" qdrant ".parse::<VectorProvider>().unwrap(), VectorProvider::Qdrant);
}

#[test]
fn given_unknown_provider_tag_when_parsing_then_unsupported_provider() {
    let err = "pinecone".parse::<VectorProvider>().unwrap_err();

    assert!(matches!(err, VectorStoreError::UnsupportedProvider(name) if name == "pinecone"));
}

#[test]
fn given_collection_config_when_created_then_document_fields_are_indexed() {
    let config = CollectionConfig::new("documents", 384);

    let document_id = config
        .payload_indexes
        .iter()
        .find(|i| i.field_name == "document_id")
        .unwrap();
    assert_eq!(document_id.field_type, PayloadFieldType::Keyword);
    assert_eq!(config.vector_dimensions, 384);
}

#[test]
fn given_non_uuid_record_id_when_mapping_point_id_then_stable_v5_uuid() {
    let first = QdrantAdapter::point_id_for("page-7");
    let second = QdrantAdapter::point_id_for("page-7");
    let uuid = "6f1c1b6e-9b0e-4c7e-8a3a-3f5d2e0c9a11";

    assert_eq!(first, second);
    assert_eq!(first.get_version_num(), 5);
    assert_eq!(QdrantAdapter::point_id_for(uuid).to_string(), uuid);
}

#[tokio::test]
async fn given_no_connection_when_using_manager_then_not_connected() {
    let manager = VectorStoreManager::new();

    let search = manager
        .search(&Embedding::new(vec![1.0]), 1, None)
        .await
        .unwrap_err();
    let index = manager
        .index(VectorRecord::new("a", Embedding::new(vec![1.0])))
        .await
        .unwrap_err();

    assert!(matches!(search, VectorStoreError::NotConnected));
    assert!(matches!(index, VectorStoreError::NotConnected));
    assert!(matches!(manager.status().await, Err(VectorStoreError::NotConnected)));
    assert_eq!(manager.provider().await, None);
}

#[tokio::test]
async fn given_unknown_provider_when_connecting_then_unsupported_provider() {
    let manager = VectorStoreManager::new();

    let err = manager
        .connect(&VectorStoreConfig::new("pinecone", 4))
        .await
        .unwrap_err();

    assert!(matches!(err, VectorStoreError::UnsupportedProvider(_)));
    assert_eq!(manager.provider().await, None);
}

#[tokio::test]
async fn given_in_memory_flat_config_when_connecting_then_manager_serves_requests() {
    let manager = VectorStoreManager::new();

    let provider = manager.connect(&VectorStoreConfig::new("faiss", 2)).await.unwrap();
    manager
        .index(VectorRecord::new("a", Embedding::new(vec![1.0, 0.0])))
        .await
        .unwrap();

    assert_eq!(provider, VectorProvider::Flat);
    assert_eq!(manager.provider().await, Some(VectorProvider::Flat));
    assert_eq!(manager.status().await.unwrap().total_indexed, 1);
}

#[tokio::test]
async fn given_sqlite_config_with_path_when_connecting_then_collection_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = VectorStoreConfig::new("chroma", 2).with_path(dir.path());
    config.collection_name = "invoices".to_string();
    let manager = VectorStoreManager::new();

    manager.connect(&config).await.unwrap();
    manager
        .index(VectorRecord::new("a", Embedding::new(vec![0.0, 1.0])))
        .await
        .unwrap();

    assert_eq!(manager.provider().await, Some(VectorProvider::Sqlite));
    assert!(dir.path().join("invoices").is_dir());
}

#[tokio::test]
async fn given_active_store_when_reconnect_fails_then_previous_store_stays() {
    let manager = VectorStoreManager::new();
    manager
        .attach(VectorProvider::Flat, Arc::new(FlatVectorStore::in_memory(2)))
        .await;

    let result = manager.connect(&VectorStoreConfig::new("milvus", 2)).await;

    assert!(result.is_err());
    assert_eq!(manager.provider().await, Some(VectorProvider::Flat));
    assert!(manager.status().await.is_ok());
}
