use std::sync::Arc;

use docextract::application::ports::VectorStore;
use docextract::application::services::{
    DEFAULT_RETRIEVAL_QUERY, PageTranscriber, RagConfig, RagRetriever,
};
use docextract::domain::{Document, DocumentKind, PageLayout, VectorRecord};
use docextract::infrastructure::persistence::FlatVectorStore;
use serde_json::{Map, Value};

use crate::support::{HashEmbedder, MockOcrEngine, MockPdfEngine, scanned_page, text_page};

const DIMENSIONS: usize = 32;

struct Fixture {
    retriever: RagRetriever,
    pdf: Arc<MockPdfEngine>,
    ocr: Arc<MockOcrEngine>,
    embedder: Arc<HashEmbedder>,
    store: Arc<FlatVectorStore>,
}

fn fixture(top_k: usize) -> Fixture {
    let pdf = Arc::new(MockPdfEngine::new(Vec::new()));
    let ocr = Arc::new(MockOcrEngine::new());
    let embedder = Arc::new(HashEmbedder::new(DIMENSIONS));
    let store = Arc::new(FlatVectorStore::in_memory(DIMENSIONS));
    let transcriber = PageTranscriber::new(pdf.clone(), ocr.clone(), 200.0, 4);
    let retriever = RagRetriever::new(
        transcriber,
        embedder.clone(),
        store.clone(),
        RagConfig {
            top_k,
            ..RagConfig::default()
        },
    );
    Fixture {
        retriever,
        pdf,
        ocr,
        embedder,
        store,
    }
}

fn document() -> Document {
    Document::new(
        "statement.pdf".to_string(),
        "application/pdf".to_string(),
        DocumentKind::Pdf,
        2048,
    )
}

fn mixed_layouts() -> Vec<PageLayout> {
    vec![
        text_page(1, &["Invoice INV-001 from ACME Corp"]),
        scanned_page(2),
        text_page(3, &["Payment terms: 30 days net"]),
        scanned_page(4),
    ]
}

#[tokio::test]
async fn given_mixed_pages_when_indexing_then_only_pages_without_text_are_ocred() {
    let f = fixture(7);

    let retrieved = f
        .retriever
        .index_and_retrieve(Arc::from(&b"%PDF"[..]), &document(), &mixed_layouts())
        .await
        .unwrap();

    assert_eq!(f.pdf.rendered_pages(), vec![2, 4]);
    assert_eq!(f.ocr.calls(), 2);
    assert_eq!(retrieved.ocr_pages, 2);
    assert_eq!(retrieved.chunk_count, 4);
    assert_eq!(retrieved.retrieved, 4);
    assert!(retrieved.context.contains("Payment terms: 30 days net"));
    assert!(retrieved.context.contains(&MockOcrEngine::text_for(4)));
    assert_eq!(f.store.status().await.unwrap().total_indexed, 4);
    assert_eq!(f.embedder.batch_calls(), 1);
    assert_eq!(f.embedder.embed_calls(), 1);
}

#[tokio::test]
async fn given_more_chunks_than_top_k_when_retrieving_then_context_is_capped() {
    let f = fixture(2);

    let retrieved = f
        .retriever
        .index_and_retrieve(Arc::from(&b"%PDF"[..]), &document(), &mixed_layouts())
        .await
        .unwrap();

    assert_eq!(retrieved.chunk_count, 4);
    assert_eq!(retrieved.retrieved, 2);
    assert_eq!(retrieved.context.split("\n\n").count(), 2);
}

#[tokio::test]
async fn given_no_pages_when_indexing_then_empty_context_without_embedding() {
    let f = fixture(7);

    let retrieved = f
        .retriever
        .index_and_retrieve(Arc::from(&b"%PDF"[..]), &document(), &[])
        .await
        .unwrap();

    assert!(retrieved.context.is_empty());
    assert_eq!(retrieved.chunk_count, 0);
    assert_eq!(f.embedder.batch_calls(), 0);
    assert_eq!(f.embedder.embed_calls(), 0);
    assert_eq!(f.store.status().await.unwrap().total_indexed, 0);
}

#[tokio::test]
async fn given_other_document_in_store_when_retrieving_then_its_chunks_are_excluded() {
    let f = fixture(7);
    let mut foreign = Map::new();
    foreign.insert("document_id".into(), Value::String("someone-else".into()));
    foreign.insert("text".into(), Value::String("Foreign statement text".into()));
    f.store
        .index(
            VectorRecord::new("foreign", f.embedder.vector_for(DEFAULT_RETRIEVAL_QUERY))
                .with_payload(foreign),
        )
        .await
        .unwrap();

    let retrieved = f
        .retriever
        .index_and_retrieve(Arc::from(&b"%PDF"[..]), &document(), &mixed_layouts())
        .await
        .unwrap();

    assert_eq!(retrieved.retrieved, 4);
    assert!(!retrieved.context.contains("Foreign statement text"));
}
