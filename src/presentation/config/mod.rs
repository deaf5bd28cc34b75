mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ENV_PREFIX, EmbeddingsSettings, LlmSettings, LoggingSettings, OcrSettings, PipelineSettings,
    RagSettings, Settings, VectorStoreSettings,
};
