use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

pub const DEFAULT_LOCAL_MODEL: &str = "BAAI/bge-small-en-v1.5";
const MAX_BATCH: usize = 32;

struct BertEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

/// BERT-family sentence embedder: mean pooling over the attention mask, L2-normalised.
pub struct LocalCandleEmbedder {
    encoder: Arc<BertEncoder>,
}

fn load_failed(what: &str) -> impl Fn(String) -> EmbedderError + '_ {
    move |e| EmbedderError::ModelLoadFailed(format!("{what}: {e}"))
}

fn inference<E: std::fmt::Display>(e: E) -> EmbedderError {
    EmbedderError::InferenceFailed(e.to_string())
}

impl LocalCandleEmbedder {
    /// Downloads (or reuses the hub cache of) the model. Blocking.
    pub fn new(model_id: &str) -> Result<Self, EmbedderError> {
        let device = Device::Cpu;
        tracing::info!(model = model_id, "Loading local embedding model");

        let api = Api::new().map_err(|e| load_failed("hub")(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| load_failed("config.json")(e.to_string()))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| load_failed("tokenizer.json")(e.to_string()))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| load_failed("model.safetensors")(e.to_string()))?;

        let config: BertConfig = std::fs::read_to_string(&config_path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
            .map_err(load_failed("config"))?;

        let mut tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| load_failed("tokenizer")(e.to_string()))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| load_failed("truncation")(e.to_string()))?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| load_failed("weights")(e.to_string()))?
        };
        let model =
            BertModel::load(vb, &config).map_err(|e| load_failed("model")(e.to_string()))?;

        tracing::info!(model = model_id, "Local embedding model loaded");

        Ok(Self {
            encoder: Arc::new(BertEncoder {
                model,
                tokenizer,
                device,
            }),
        })
    }

    async fn encode(&self, texts: Vec<String>) -> Result<Vec<Embedding>, EmbedderError> {
        let encoder = Arc::clone(&self.encoder);
        tokio::task::spawn_blocking(move || {
            let mut out = Vec::with_capacity(texts.len());
            for batch in texts.chunks(MAX_BATCH) {
                out.extend(encoder.encode_batch(batch)?);
            }
            Ok::<_, EmbedderError>(out)
        })
        .await
        .map_err(inference)?
    }
}

impl BertEncoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(inference)?;

        let width = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let rows = texts.len();

        let mut input_ids = Vec::with_capacity(rows * width);
        let mut type_ids = Vec::with_capacity(rows * width);
        let mut mask = Vec::with_capacity(rows * width);
        for encoding in &encodings {
            let pad = width - encoding.get_ids().len();
            input_ids.extend(encoding.get_ids().iter().copied().chain(std::iter::repeat_n(0, pad)));
            type_ids.extend(encoding.get_type_ids().iter().copied().chain(std::iter::repeat_n(0, pad)));
            mask.extend(encoding.get_attention_mask().iter().copied().chain(std::iter::repeat_n(0, pad)));
        }

        let input_ids = Tensor::from_vec(input_ids, (rows, width), &self.device).map_err(inference)?;
        let type_ids = Tensor::from_vec(type_ids, (rows, width), &self.device).map_err(inference)?;
        let mask = Tensor::from_vec(mask, (rows, width), &self.device).map_err(inference)?;

        let hidden = self
            .model
            .forward(&input_ids, &type_ids, Some(&mask))
            .map_err(inference)?;

        let mask = mask.to_dtype(DType::F32).map_err(inference)?;
        let summed = hidden
            .broadcast_mul(&mask.unsqueeze(2).map_err(inference)?)
            .and_then(|t| t.sum(1))
            .map_err(inference)?;
        let counts = mask.sum(1).and_then(|t| t.unsqueeze(1)).map_err(inference)?;
        let pooled = summed.broadcast_div(&counts).map_err(inference)?;

        (0..rows)
            .map(|i| {
                let values: Vec<f32> = pooled.get(i).and_then(|t| t.to_vec1()).map_err(inference)?;
                Ok(Embedding::new(values).normalized())
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for LocalCandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.encode(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::InferenceFailed("empty result".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode(texts.iter().map(|t| (*t).to_string()).collect())
            .await
    }
}
