use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProviderConfigError;
use crate::infrastructure::observability::sanitize_prompt;

/// Connection settings shared by every OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatEndpoint {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ChatEndpoint {
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn build_client(&self, label: &'static str) -> Result<Client, ProviderConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderConfigError::MissingApiKey(label));
        }
        Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProviderConfigError::HttpClient(e.to_string()))
    }
}

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatRequestMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

#[derive(Serialize)]
pub(crate) struct ChatRequestMessage<'a> {
    pub role: &'a str,
    pub content: Value,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug)]
pub(crate) enum ChatCallError {
    Transport(String),
    Upstream { status: u16, body: String },
    MissingContent(String),
}

/// Posts one chat completion and returns `choices[0].message.content`.
pub(crate) async fn post_chat_completion(
    client: &Client,
    endpoint: &ChatEndpoint,
    request: &ChatRequest<'_>,
) -> Result<String, ChatCallError> {
    let response = client
        .post(endpoint.completions_url())
        .bearer_auth(&endpoint.api_key)
        .json(request)
        .send()
        .await
        .map_err(|e| ChatCallError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %sanitize_prompt(&body), "Chat completion rejected");
        return Err(ChatCallError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let raw = response
        .bytes()
        .await
        .map_err(|e| ChatCallError::Transport(e.to_string()))?;

    let completion: ChatCompletion = serde_json::from_slice(&raw).map_err(|e| {
        tracing::error!(
            raw_response = %sanitize_prompt(&String::from_utf8_lossy(&raw)),
            "Failed to parse chat completion"
        );
        ChatCallError::MissingContent(e.to_string())
    })?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ChatCallError::MissingContent("choices[0].message.content is absent".to_string()))
}
