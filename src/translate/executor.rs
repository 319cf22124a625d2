use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{PolytalkError, Result};
use crate::language::LanguageRegistry;
use crate::models::ModelPair;
use super::{ModelPath, hop};

/// Final text of one translation and the hops it went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
    pub path: Vec<String>,
}

impl TranslationResult {
    /// Hops joined for display, e.g. "Japanese → English ➔ English → French"
    pub fn path_display(&self) -> String {
        self.path.join(" ➔ ")
    }
}

/// Runs resolved model paths
pub struct TranslationExecutor {
    registry: Arc<LanguageRegistry>,
}

impl TranslationExecutor {
    pub fn new(registry: Arc<LanguageRegistry>) -> Self {
        Self { registry }
    }

    pub async fn translate(&self, text: &str, path: &ModelPath) -> Result<TranslationResult> {
        let label = |code: &str| self.registry.label_for_code(code);

        match path {
            ModelPath::Unavailable { source, target, .. } => Err(PolytalkError::PathUnavailable {
                from: label(source),
                to: label(target),
            }),
            ModelPath::Direct { source, target, pair } => {
                require_text(text)?;
                let translated = run_inference(pair, text).await?;
                Ok(TranslationResult {
                    text: translated,
                    path: vec![hop(&label(source), &label(target))],
                })
            }
            ModelPath::Pivot { source, pivot, target, source_to_pivot, pivot_to_target } => {
                require_text(text)?;
                info!("Using two-step translation via {}", label(pivot));
                let intermediate = run_inference(source_to_pivot, text).await?;
                debug!("Intermediate ({}): {}", pivot, intermediate);
                let translated = run_inference(pivot_to_target, &intermediate).await?;

                Ok(TranslationResult {
                    text: translated,
                    path: vec![
                        hop(&label(source), &label(pivot)),
                        hop(&label(pivot), &label(target)),
                    ],
                })
            }
        }
    }
}

/// One encode → generate → decode call on a model pair.
///
/// Input longer than the tokenizer's maximum length is truncated; the overflow
/// is dropped. Special tokens are stripped from the decoded output, which is
/// returned as the translation even when empty.
pub async fn run_inference(pair: &ModelPair, text: &str) -> Result<String> {
    let ids = pair.tokenizer.encode(text).await.map_err(as_translation_error)?;
    let original_len = ids.len();
    let ids = truncate_ids(ids, pair.tokenizer.max_length(), pair.tokenizer.eos_token_id());

    if ids.len() < original_len {
        debug!(
            "Truncated input for {} from {} to {} tokens",
            pair.name, original_len, ids.len()
        );
    }

    let output = pair.model.generate(&ids).await.map_err(as_translation_error)?;
    let decoded = pair.tokenizer.decode(&output, true).await.map_err(as_translation_error)?;

    if decoded.trim().is_empty() {
        debug!("{} produced an empty translation", pair.name);
    }

    Ok(decoded.trim().to_string())
}

/// Keep at most `max_length` ids, ending with the EOS id when one is declared
pub fn truncate_ids(mut ids: Vec<u32>, max_length: usize, eos_token_id: Option<u32>) -> Vec<u32> {
    if ids.len() <= max_length {
        return ids;
    }

    ids.truncate(max_length);
    if let (Some(eos), Some(last)) = (eos_token_id, ids.last_mut()) {
        *last = eos;
    }
    ids
}

fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        Err(PolytalkError::EmptyInput)
    } else {
        Ok(())
    }
}

fn as_translation_error(e: PolytalkError) -> PolytalkError {
    match e {
        PolytalkError::Translation(_) => e,
        other => PolytalkError::Translation(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::ModelProvider;
    use crate::models::testing::{FakeProvider, POISON, SILENT};
    use crate::translate::{AttemptFailure, AttemptKind, ModelResolver};

    fn setup(pairs: &[(&str, &str)]) -> (ModelResolver, TranslationExecutor) {
        let resolver = ModelResolver::new(
            Box::new(FakeProvider::with_pairs(pairs)),
            &Config::default().translate,
        );
        let executor = TranslationExecutor::new(Arc::new(LanguageRegistry::default()));
        (resolver, executor)
    }

    #[tokio::test]
    async fn test_direct_translation_single_hop() {
        let (resolver, executor) = setup(&[("en", "es")]);
        let path = resolver.resolve("en", "es").await;

        let result = executor.translate("Hello world", &path).await.unwrap();
        assert_eq!(result.text, "es(Hello world)");
        assert_eq!(result.path, vec!["English → Spanish"]);
    }

    #[tokio::test]
    async fn test_pivot_translation_chains_intermediate_output() {
        let (resolver, executor) = setup(&[("ja", "en"), ("en", "fr")]);
        let path = resolver.resolve("ja", "fr").await;

        let result = executor.translate("こんにちは", &path).await.unwrap();
        assert_eq!(result.text, "fr(en(こんにちは))");
        assert_eq!(result.path, vec!["Japanese → English", "English → French"]);

        let first_end = result.path[0].rsplit(" → ").next().unwrap();
        let second_start = result.path[1].split(" → ").next().unwrap();
        assert_eq!(first_end, second_start);
        assert_eq!(result.path_display(), "Japanese → English ➔ English → French");
    }

    #[tokio::test]
    async fn test_unavailable_path_fails_without_inference() {
        let executor = TranslationExecutor::new(Arc::new(LanguageRegistry::default()));
        let path = ModelPath::Unavailable {
            source: "ja".to_string(),
            target: "ko".to_string(),
            failures: vec![AttemptFailure {
                attempt: AttemptKind::Direct,
                reason: "model not published".to_string(),
            }],
        };

        match executor.translate("こんにちは", &path).await {
            Err(PolytalkError::PathUnavailable { from, to }) => {
                assert_eq!(from, "Japanese");
                assert_eq!(to, "Korean");
            }
            other => panic!("expected PathUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unavailable_resolution_runs_no_generate_call() {
        let provider = Arc::new(FakeProvider::with_pairs(&[("ja", "en")]));
        let executor = TranslationExecutor::new(Arc::new(LanguageRegistry::default()));
        let resolver = ModelResolver::new(Box::new(provider.clone()), &Config::default().translate);

        let path = resolver.resolve("ja", "ko").await;
        let err = executor.translate("こんにちは", &path).await.unwrap_err();
        assert_eq!(err.to_string(), "Translation from Japanese to Korean not supported");
        assert_eq!(provider.generate_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_input_rejected() {
        let (resolver, executor) = setup(&[("en", "es")]);
        let path = resolver.resolve("en", "es").await;

        assert!(matches!(
            executor.translate("   \n", &path).await,
            Err(PolytalkError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn test_generation_failure_is_translation_error() {
        let (resolver, executor) = setup(&[("en", "es")]);
        let path = resolver.resolve("en", "es").await;

        match executor.translate(POISON, &path).await {
            Err(PolytalkError::Translation(msg)) => assert!(msg.contains("generation failed")),
            other => panic!("expected Translation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_long_input_is_truncated_before_generation() {
        let provider = FakeProvider::with_pairs(&[("en", "de")]).with_max_length(6);
        let pair = provider.load("Helsinki-NLP/opus-mt-en-de").await.unwrap();

        let translated = run_inference(&pair, "abcdefghij").await.unwrap();
        assert_eq!(translated, "de(abcde)");
    }

    #[test]
    fn test_empty_decoded_output_is_the_translation() {
        let provider = FakeProvider::with_pairs(&[("en", "es")]);
        let pair = tokio_test::block_on(provider.load("Helsinki-NLP/opus-mt-en-es")).unwrap();

        let translated = tokio_test::assert_ok!(tokio_test::block_on(run_inference(&pair, SILENT)));
        assert_eq!(translated, "");
    }

    #[tokio::test]
    async fn test_pivot_second_hop_failure_is_translation_error() {
        let provider = Arc::new(FakeProvider::with_pairs(&[("ja", "en")]));
        provider.publish_broken("en", "fr");
        let resolver = ModelResolver::new(Box::new(provider.clone()), &Config::default().translate);
        let executor = TranslationExecutor::new(Arc::new(LanguageRegistry::default()));

        let path = resolver.resolve("ja", "fr").await;
        assert!(path.is_pivot());

        match executor.translate("こんにちは", &path).await {
            Err(PolytalkError::Translation(msg)) => assert!(msg.contains("generation failed")),
            other => panic!("expected Translation error, got {:?}", other),
        }
        assert_eq!(provider.generate_calls(), 2);
    }

    #[test]
    fn test_truncate_ids_keeps_eos_last() {
        assert_eq!(truncate_ids(vec![5, 6, 7, 0], 8, Some(0)), vec![5, 6, 7, 0]);
        assert_eq!(truncate_ids(vec![5, 6, 7, 8, 0], 3, Some(0)), vec![5, 6, 0]);
        assert_eq!(truncate_ids(vec![5, 6, 7, 8], 2, None), vec![5, 6]);
    }
}
