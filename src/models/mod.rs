// Translation model backends
//
// A published translation model is a tokenizer plus a sequence-to-sequence model,
// loaded by name through a ModelProvider:
// - Http: model inference server reached over HTTP
//
// Names follow "{prefix}-{source}-{target}", e.g. "Helsinki-NLP/opus-mt-en-es".

pub mod http;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::TranslateConfig;
use crate::error::Result;

/// Tokenizer half of a model pair
#[async_trait]
pub trait Tokenizer: Send + Sync {
    /// Convert text to token ids, including any end-of-sequence marker
    async fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Convert generated token ids back to text
    async fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String>;

    /// Maximum number of input ids the model accepts
    fn max_length(&self) -> usize;

    /// End-of-sequence id kept as the last token when input is truncated
    fn eos_token_id(&self) -> Option<u32>;
}

/// Model half of a model pair
#[async_trait]
pub trait Seq2SeqModel: Send + Sync {
    /// Generate output ids with the engine's default decoding settings
    async fn generate(&self, input_ids: &[u32]) -> Result<Vec<u32>>;
}

/// Loaded tokenizer and model for one language direction
#[derive(Clone)]
pub struct ModelPair {
    pub name: String,
    pub tokenizer: Arc<dyn Tokenizer>,
    pub model: Arc<dyn Seq2SeqModel>,
}

impl std::fmt::Debug for ModelPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPair").field("name", &self.name).finish()
    }
}

/// Source of published model pairs
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Load the named pair; fails when it is not published or cannot be fetched
    async fn load(&self, name: &str) -> Result<ModelPair>;
}

/// Name of the model translating `source` to `target`
pub fn model_name(prefix: &str, source: &str, target: &str) -> String {
    format!("{}-{}-{}", prefix, source, target)
}

/// Factory for creating model provider instances
pub struct ModelProviderFactory;

impl ModelProviderFactory {
    /// Create the default provider (model inference server over HTTP)
    pub fn create_provider(config: &TranslateConfig) -> Result<Box<dyn ModelProvider>> {
        Ok(Box::new(http::HttpModelProvider::new(config)?))
    }
}
