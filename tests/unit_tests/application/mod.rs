mod document_classifier_test;
mod json_repair_test;
mod output_sanitizer_test;
mod page_transcriber_test;
mod rag_retriever_test;
mod structured_extractor_test;
