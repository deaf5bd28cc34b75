use std::sync::Arc;

use serde_json::{Map, Value};

use super::json_repair::{MalformedOutput, repair_json};
use super::output_sanitizer::strip_null_entries;
use super::token_counter::count_tokens;
use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{ExtractionSchema, Table};

pub const EXTRACTION_SYSTEM_PROMPT: &str = "You extract structured data from documents.";

/// Turns extracted document content into a null-free JSON object shaped by the schema.
pub struct StructuredExtractor {
    llm_client: Arc<dyn LlmClient>,
}

impl StructuredExtractor {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    #[tracing::instrument(skip_all, fields(fields = schema.len(), tables = tables.len()))]
    pub async fn extract(
        &self,
        text: &str,
        tables: &[Table],
        instruction: &str,
        schema: &ExtractionSchema,
    ) -> Result<Map<String, Value>, StructuredExtractionError> {
        let prompt = build_extraction_prompt(text, tables, instruction, schema);
        tracing::debug!(prompt_tokens = count_tokens(&prompt), "Requesting structured extraction");

        let raw = self
            .llm_client
            .complete(EXTRACTION_SYSTEM_PROMPT, &prompt)
            .await?;

        let repaired = repair_json(&raw)?;
        Ok(strip_null_entries(repaired))
    }
}

pub fn build_extraction_prompt(
    text: &str,
    tables: &[Table],
    instruction: &str,
    schema: &ExtractionSchema,
) -> String {
    let tables = serde_json::to_string(tables).unwrap_or_else(|_| "[]".to_string());
    let target_schema = Value::Object(schema.target_schema());

    format!(
        "You are a structured document extraction model.\n\n\
         --- DOCUMENT TEXT ---\n{text}\n\n\
         --- TABLES FOUND ---\n{tables}\n\n\
         --- EXTRACTION INSTRUCTIONS ---\n{instruction}\n\n\
         --- FIELD-SPECIFIC DETAILS ---\n{fields}\n\
         --- STRICT JSON SCHEMA ---\n{target_schema}\n\n\
         Rules:\n\
         1. Output strictly valid JSON.\n\
         2. Include ALL fields in the schema.\n\
         3. Do NOT include explanations.\n",
        fields = schema.field_instructions(),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum StructuredExtractionError {
    #[error("completion: {0}")]
    Completion(#[from] LlmClientError),
    #[error(transparent)]
    Malformed(#[from] MalformedOutput),
}
