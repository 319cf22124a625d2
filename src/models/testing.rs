//! In-memory model provider for tests.
//!
//! The fake tokenizer maps each char to its code point and appends EOS (0).
//! The fake model "translates" by wrapping the input as `{target}({text})`,
//! prefixing its output with PAD (1), so a ja→en→fr pivot yields `fr(en(..))`.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{PolytalkError, Result};
use super::{ModelPair, ModelProvider, Seq2SeqModel, Tokenizer, model_name};

pub const PREFIX: &str = "Helsinki-NLP/opus-mt";
pub const EOS: u32 = 0;
pub const PAD: u32 = 1;

/// Input that makes the fake model fail during generation
pub const POISON: &str = "💥";

/// Input for which the fake model generates only special tokens
pub const SILENT: &str = "🤐";

#[derive(Default)]
pub struct FakeProvider {
    published: Mutex<HashSet<String>>,
    broken: Mutex<HashSet<String>>,
    loads: Mutex<HashMap<String, usize>>,
    generate_calls: Arc<AtomicUsize>,
    max_length: usize,
}

impl FakeProvider {
    pub fn with_pairs(pairs: &[(&str, &str)]) -> Self {
        let provider = Self {
            max_length: 512,
            ..Default::default()
        };
        for (source, target) in pairs {
            provider.publish(source, target);
        }
        provider
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn publish(&self, source: &str, target: &str) {
        self.published
            .lock()
            .unwrap()
            .insert(model_name(PREFIX, source, target));
    }

    /// Publish a pair whose model loads but fails every generate call
    pub fn publish_broken(&self, source: &str, target: &str) {
        let name = model_name(PREFIX, source, target);
        self.published.lock().unwrap().insert(name.clone());
        self.broken.lock().unwrap().insert(name);
    }

    /// Number of load attempts made for a name, successful or not
    pub fn load_count(&self, source: &str, target: &str) -> usize {
        self.loads
            .lock()
            .unwrap()
            .get(&model_name(PREFIX, source, target))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.lock().unwrap().values().sum()
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelProvider for FakeProvider {
    async fn load(&self, name: &str) -> Result<ModelPair> {
        *self.loads.lock().unwrap().entry(name.to_string()).or_insert(0) += 1;

        if !self.published.lock().unwrap().contains(name) {
            return Err(PolytalkError::ModelLoad {
                model: name.to_string(),
                reason: "model not published".to_string(),
            });
        }

        let target = name.rsplit('-').next().unwrap_or_default().to_string();
        let model = Arc::new(FakeModel {
            target,
            max_length: self.max_length,
            broken: self.broken.lock().unwrap().contains(name),
            generate_calls: self.generate_calls.clone(),
        });

        Ok(ModelPair {
            name: name.to_string(),
            tokenizer: model.clone(),
            model,
        })
    }
}

/// Lets a test keep inspecting the provider it handed to a resolver
#[async_trait]
impl ModelProvider for Arc<FakeProvider> {
    async fn load(&self, name: &str) -> Result<ModelPair> {
        <FakeProvider as ModelProvider>::load(self, name).await
    }
}

pub struct FakeModel {
    target: String,
    max_length: usize,
    broken: bool,
    generate_calls: Arc<AtomicUsize>,
}

pub fn encode_chars(text: &str) -> Vec<u32> {
    let mut ids: Vec<u32> = text.chars().map(|c| c as u32).collect();
    ids.push(EOS);
    ids
}

pub fn decode_chars(ids: &[u32], skip_special_tokens: bool) -> String {
    ids.iter()
        .filter(|id| !skip_special_tokens || (**id != EOS && **id != PAD))
        .map(|id| match *id {
            EOS => "</s>".to_string(),
            PAD => "<pad>".to_string(),
            other => char::from_u32(other).map(String::from).unwrap_or_default(),
        })
        .collect()
}

#[async_trait]
impl Tokenizer for FakeModel {
    async fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(encode_chars(text))
    }

    async fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        Ok(decode_chars(ids, skip_special_tokens))
    }

    fn max_length(&self) -> usize {
        self.max_length
    }

    fn eos_token_id(&self) -> Option<u32> {
        Some(EOS)
    }
}

#[async_trait]
impl Seq2SeqModel for FakeModel {
    async fn generate(&self, input_ids: &[u32]) -> Result<Vec<u32>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);

        let input = decode_chars(input_ids, true);
        if self.broken || input.contains(POISON) {
            return Err(PolytalkError::Translation("generation failed".to_string()));
        }
        if input.contains(SILENT) {
            return Ok(vec![PAD, EOS]);
        }

        let mut output = vec![PAD];
        output.extend(encode_chars(&format!("{}({})", self.target, input)));
        Ok(output)
    }
}
