mod embedder_factory;
mod local_candle_embedder;
mod shared_embedder;

pub use embedder_factory::{EmbedderFactory, EmbedderFactoryError, EmbedderSettings, EmbeddingProvider};
pub use local_candle_embedder::{DEFAULT_LOCAL_MODEL, LocalCandleEmbedder};
pub use shared_embedder::SharedEmbedder;
