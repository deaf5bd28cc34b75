mod chat_completion;
mod embeder;
mod openai_client;
mod openai_embedder;
mod provider_config_error;

pub use chat_completion::ChatEndpoint;
pub(crate) use chat_completion::{ChatCallError, ChatRequest, ChatRequestMessage, post_chat_completion};
pub use embeder::{
    DEFAULT_LOCAL_MODEL, EmbedderFactory, EmbedderFactoryError, EmbedderSettings,
    EmbeddingProvider, LocalCandleEmbedder, SharedEmbedder,
};
pub use openai_client::OpenAiClient;
pub use openai_embedder::{DEFAULT_OPENAI_BASE_URL, OpenAiEmbedder};
pub use provider_config_error::ProviderConfigError;
