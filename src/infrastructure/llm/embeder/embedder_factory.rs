use std::sync::Arc;

use crate::application::ports::Embedder;
use crate::infrastructure::llm::{LocalCandleEmbedder, OpenAiEmbedder, ProviderConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Local,
    #[serde(alias = "open_ai")]
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct EmbedderSettings {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

pub struct EmbedderFactory;

#[derive(Debug, thiserror::Error)]
pub enum EmbedderFactoryError {
    #[error("embedder configuration: {0}")]
    Configuration(#[from] ProviderConfigError),
    #[error("model initialization failed: {0}")]
    InitializationFailed(String),
}

impl EmbedderFactory {
    /// Builds the configured embedder. Loading a local model blocks.
    pub fn create(settings: &EmbedderSettings) -> Result<Arc<dyn Embedder>, EmbedderFactoryError> {
        match settings.provider {
            EmbeddingProvider::Local => {
                let embedder = LocalCandleEmbedder::new(&settings.model)
                    .map_err(|e| EmbedderFactoryError::InitializationFailed(e.to_string()))?;
                Ok(Arc::new(embedder))
            }
            EmbeddingProvider::OpenAi => {
                tracing::info!(model = %settings.model, "Using OpenAI-compatible embeddings");
                let embedder = OpenAiEmbedder::new(
                    settings.api_key.clone().unwrap_or_default(),
                    settings.model.clone(),
                    settings.base_url.clone(),
                )?;
                Ok(Arc::new(embedder))
            }
        }
    }

    /// Fails fast on settings that can never produce an embedder.
    pub fn validate(settings: &EmbedderSettings) -> Result<(), EmbedderFactoryError> {
        match settings.provider {
            EmbeddingProvider::OpenAi
                if settings.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) =>
            {
                Err(ProviderConfigError::MissingApiKey("openai embeddings").into())
            }
            _ => Ok(()),
        }
    }
}
