use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::ProviderConfigError;
use super::chat_completion::{
    ChatCallError, ChatEndpoint, ChatRequest, ChatRequestMessage, post_chat_completion,
};
use crate::application::ports::{LlmClient, LlmClientError};
use crate::infrastructure::observability::sanitize_prompt;

/// Chat-completion client used for the structured extraction call.
pub struct OpenAiClient {
    client: Client,
    endpoint: ChatEndpoint,
    json_response_format: bool,
}

impl OpenAiClient {
    pub fn new(endpoint: ChatEndpoint, json_response_format: bool) -> Result<Self, ProviderConfigError> {
        Ok(Self {
            client: endpoint.build_client("llm")?,
            endpoint,
            json_response_format,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    #[tracing::instrument(skip_all, fields(model = %self.endpoint.model))]
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmClientError> {
        let request = ChatRequest {
            model: &self.endpoint.model,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: Value::String(system_prompt.to_string()),
                },
                ChatRequestMessage {
                    role: "user",
                    content: Value::String(user_prompt.to_string()),
                },
            ],
            temperature: self.endpoint.temperature,
            max_tokens: self.endpoint.max_tokens,
            response_format: self
                .json_response_format
                .then(|| json!({ "type": "json_object" })),
        };

        let content = post_chat_completion(&self.client, &self.endpoint, &request)
            .await
            .map_err(|e| match e {
                ChatCallError::Transport(reason) => LlmClientError::ApiRequestFailed(reason),
                ChatCallError::Upstream { status, body } => LlmClientError::Upstream { status, body },
                ChatCallError::MissingContent(reason) => LlmClientError::InvalidResponse(reason),
            })?;

        tracing::debug!(response = %sanitize_prompt(&content), "Completion received");
        Ok(content)
    }
}
