use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::config::TranslateConfig;
use crate::models::{ModelProvider, model_name};
use super::{AttemptFailure, AttemptKind, ModelPath};

type PairKey = (String, String);

/// Chooses between a direct model pair and a pivot composition.
///
/// Successful resolutions are memoized for the lifetime of the resolver. Each
/// language pair owns a `OnceCell`, so concurrent first loads of the same pair
/// are serialized. A failed resolution removes the pair's entry and the pair
/// is resolved from scratch on the next request.
pub struct ModelResolver {
    provider: Box<dyn ModelProvider>,
    model_prefix: String,
    pivot: String,
    cache: Mutex<HashMap<PairKey, Arc<OnceCell<ModelPath>>>>,
}

impl ModelResolver {
    pub fn new(provider: Box<dyn ModelProvider>, config: &TranslateConfig) -> Self {
        Self {
            provider,
            model_prefix: config.model_prefix.clone(),
            pivot: config.pivot_language.clone(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn pivot_language(&self) -> &str {
        &self.pivot
    }

    /// Resolve the path for a language pair. Never fails: absence of a usable
    /// path is reported as `ModelPath::Unavailable`.
    pub async fn resolve(&self, source: &str, target: &str) -> ModelPath {
        let key = (source.to_string(), target.to_string());
        let cell = {
            let mut cache = self.cache.lock().await;
            cache.entry(key.clone()).or_default().clone()
        };

        if cell.initialized() {
            debug!("Model path cache hit: {} -> {}", source, target);
        }

        match cell.get_or_try_init(|| self.resolve_uncached(source, target)).await {
            Ok(path) => path.clone(),
            Err(failures) => {
                self.forget_unresolved(&key, &cell).await;
                ModelPath::Unavailable {
                    source: source.to_string(),
                    target: target.to_string(),
                    failures,
                }
            }
        }
    }

    /// Drop the cache entry of a pair whose resolution failed, unless another
    /// request has since replaced or filled it
    async fn forget_unresolved(&self, key: &PairKey, cell: &Arc<OnceCell<ModelPath>>) {
        let mut cache = self.cache.lock().await;
        if let Some(current) = cache.get(key) {
            if Arc::ptr_eq(current, cell) && !current.initialized() {
                cache.remove(key);
            }
        }
    }

    async fn resolve_uncached(&self, source: &str, target: &str) -> Result<ModelPath, Vec<AttemptFailure>> {
        let direct_failure = match self.attempt_direct(source, target).await {
            Ok(path) => return Ok(path),
            Err(failure) => failure,
        };

        match self.attempt_pivot(source, target).await {
            Ok(path) => Ok(path),
            Err(pivot_failure) => {
                info!("No translation path from {} to {}", source, target);
                Err(vec![direct_failure, pivot_failure])
            }
        }
    }

    /// Try the model trained for source→target
    pub async fn attempt_direct(&self, source: &str, target: &str) -> Result<ModelPath, AttemptFailure> {
        let name = model_name(&self.model_prefix, source, target);

        match self.provider.load(&name).await {
            Ok(pair) => {
                info!("Using direct model {}", name);
                Ok(ModelPath::Direct {
                    source: source.to_string(),
                    target: target.to_string(),
                    pair,
                })
            }
            Err(e) => {
                warn!("Direct model {} unavailable: {}", name, e);
                Err(AttemptFailure {
                    attempt: AttemptKind::Direct,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Try source→pivot followed by pivot→target; both models must load
    pub async fn attempt_pivot(&self, source: &str, target: &str) -> Result<ModelPath, AttemptFailure> {
        if source == self.pivot || target == self.pivot {
            return Err(AttemptFailure {
                attempt: AttemptKind::Pivot,
                reason: format!("{} is already an endpoint of the pair", self.pivot),
            });
        }

        let failure = |name: &str, e: crate::error::PolytalkError| {
            warn!("Pivot model {} unavailable: {}", name, e);
            AttemptFailure {
                attempt: AttemptKind::Pivot,
                reason: e.to_string(),
            }
        };

        let first_name = model_name(&self.model_prefix, source, &self.pivot);
        let source_to_pivot = self.provider.load(&first_name).await
            .map_err(|e| failure(&first_name, e))?;

        let second_name = model_name(&self.model_prefix, &self.pivot, target);
        let pivot_to_target = self.provider.load(&second_name).await
            .map_err(|e| failure(&second_name, e))?;

        info!("Using pivot models {} and {}", first_name, second_name);
        Ok(ModelPath::Pivot {
            source: source.to_string(),
            pivot: self.pivot.clone(),
            target: target.to_string(),
            source_to_pivot,
            pivot_to_target,
        })
    }

    /// Number of language pairs with a memoized path
    pub async fn cached_pairs(&self) -> usize {
        self.cache
            .lock()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}
