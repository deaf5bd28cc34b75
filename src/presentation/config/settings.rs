use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::{DEFAULT_RETRIEVAL_QUERY, DocumentClassifier, RagConfig};
use crate::infrastructure::llm::{
    ChatEndpoint, DEFAULT_LOCAL_MODEL, EmbedderSettings, EmbeddingProvider,
};
use crate::infrastructure::persistence::VectorStoreConfig;

pub const ENV_PREFIX: &str = "DOCEX";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub rag: RagSettings,
    pub vector_store: VectorStoreSettings,
    pub embeddings: EmbeddingsSettings,
    pub ocr: OcrSettings,
    pub llm: LlmSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub large_document_page_threshold: u32,
    pub min_meaningful_text_chars: usize,
    pub render_dpi: f32,
    pub page_concurrency: usize,
    pub rag_enabled: bool,
    pub domain_instruction: String,
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            large_document_page_threshold: 5,
            min_meaningful_text_chars: 10,
            render_dpi: 200.0,
            page_concurrency: 4,
            rag_enabled: true,
            domain_instruction: String::new(),
            pdfium_library_dir: None,
        }
    }
}

impl PipelineSettings {
    pub fn classifier(&self) -> DocumentClassifier {
        DocumentClassifier::new(
            self.large_document_page_threshold,
            self.min_meaningful_text_chars,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub top_k: usize,
    pub query: String,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: 7,
            query: DEFAULT_RETRIEVAL_QUERY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    pub provider: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<PathBuf>,
    pub collection_name: String,
    pub vector_size: usize,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "flat".to_string(),
            host: None,
            port: None,
            path: None,
            collection_name: "documents".to_string(),
            vector_size: 384,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingsSettings {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for EmbeddingsSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Local,
            model: DEFAULT_LOCAL_MODEL.to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: String::new(),
            model: "google/gemma-3-12b-it".to_string(),
            temperature: 0.1,
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_response_format: bool,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: String::new(),
            model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: 2000,
            json_response_format: true,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub json: bool,
}

impl Settings {
    /// `.env`, then `config/base.toml`, `config/{APP_ENVIRONMENT}.toml`, then `DOCEX__*`
    /// environment variables. Every layer is optional.
    pub fn load() -> Result<(Self, Environment), ConfigError> {
        dotenvy::dotenv().ok();
        let environment = Environment::from_env().map_err(ConfigError::Message)?;
        let settings = Self::load_from(Path::new("config"), environment)?;
        Ok((settings, environment))
    }

    pub fn load_from(config_dir: &Path, environment: Environment) -> Result<Self, ConfigError> {
        Self::load_layers(config_dir, environment, None)
    }

    /// Same layering as [`Settings::load_from`]; `env_vars` replaces the process
    /// environment as the `DOCEX__*` source when given.
    pub fn load_layers(
        config_dir: &Path,
        environment: Environment,
        env_vars: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let base = config_dir.join("base");
        let layered = config_dir.join(environment.as_str());

        Config::builder()
            .add_source(File::from(base).required(false))
            .add_source(File::from(layered).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env_vars),
            )
            .build()?
            .try_deserialize()
    }

    pub fn rag_config(&self) -> RagConfig {
        RagConfig {
            top_k: self.rag.top_k,
            query: self.rag.query.clone(),
            min_meaningful_text_chars: self.pipeline.min_meaningful_text_chars,
        }
    }

    pub fn vector_store_config(&self) -> VectorStoreConfig {
        VectorStoreConfig {
            provider: self.vector_store.provider.clone(),
            host: self.vector_store.host.clone(),
            port: self.vector_store.port,
            path: self.vector_store.path.clone(),
            collection_name: self.vector_store.collection_name.clone(),
            vector_size: self.vector_store.vector_size,
        }
    }

    pub fn embedder_settings(&self) -> EmbedderSettings {
        EmbedderSettings {
            provider: self.embeddings.provider,
            model: self.embeddings.model.clone(),
            api_key: self.embeddings.api_key.clone(),
            base_url: self.embeddings.base_url.clone(),
        }
    }

    pub fn ocr_endpoint(&self) -> ChatEndpoint {
        ChatEndpoint {
            base_url: self.ocr.base_url.clone(),
            api_key: self.ocr.api_key.clone(),
            model: self.ocr.model.clone(),
            temperature: self.ocr.temperature,
            max_tokens: self.ocr.max_tokens,
            timeout: Duration::from_secs(self.ocr.timeout_secs),
        }
    }

    pub fn llm_endpoint(&self) -> ChatEndpoint {
        ChatEndpoint {
            base_url: self.llm.base_url.clone(),
            api_key: self.llm.api_key.clone(),
            model: self.llm.model.clone(),
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }
}
