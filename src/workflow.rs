use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{PolytalkError, Result};
use crate::history::HistoryEntry;
use crate::language::LanguageRegistry;
use crate::models::ModelProviderFactory;
use crate::session::Session;
use crate::speech::{AudioClip, SpeechSynthesizer};
use crate::translate::{ModelPath, ModelResolver, TranslationExecutor, TranslationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-visible message produced while handling a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Everything the display layer needs after one Translate action
#[derive(Debug, Default)]
pub struct Submission {
    pub result: Option<TranslationResult>,
    pub audio: Option<AudioClip>,
    pub notices: Vec<Notice>,
}

impl Submission {
    fn rejected(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.level == NoticeLevel::Error)
    }
}

/// The Translate action: resolve → translate → record → synthesize
pub struct Workflow {
    registry: Arc<LanguageRegistry>,
    resolver: Arc<ModelResolver>,
    executor: TranslationExecutor,
    synthesizer: SpeechSynthesizer,
}

impl Workflow {
    pub fn new(config: &Config) -> Result<Self> {
        let registry = Arc::new(LanguageRegistry::default());
        let provider = ModelProviderFactory::create_provider(&config.translate)?;
        let resolver = Arc::new(ModelResolver::new(provider, &config.translate));
        let synthesizer = SpeechSynthesizer::from_config(&config.speech)?;

        Ok(Self::with_components(registry, resolver, synthesizer))
    }

    pub fn with_components(
        registry: Arc<LanguageRegistry>,
        resolver: Arc<ModelResolver>,
        synthesizer: SpeechSynthesizer,
    ) -> Self {
        Self {
            executor: TranslationExecutor::new(registry.clone()),
            registry,
            resolver,
            synthesizer,
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }

    /// Handle one submission. Core failures never escape: each becomes a
    /// notice, and a failed synthesis still returns the translated text.
    pub async fn submit(&self, session: &mut Session, text: &str) -> Submission {
        if text.trim().is_empty() {
            return Submission::rejected(Notice::warning(PolytalkError::EmptyInput.to_string()));
        }

        let source = session.source().clone();
        let target = session.target().clone();
        info!("┌─ Translating {} → {} ────────", source.label, target.label);

        let path = self.resolver.resolve(&source.code, &target.code).await;
        let mut notices = Vec::new();

        match &path {
            ModelPath::Unavailable { failures, .. } => {
                for failure in failures {
                    info!("│ {}", failure);
                }
                info!("└─ not supported");
                return Submission::rejected(Notice::error(
                    PolytalkError::PathUnavailable {
                        from: source.label.clone(),
                        to: target.label.clone(),
                    }
                    .to_string(),
                ));
            }
            ModelPath::Pivot { pivot, .. } => {
                notices.push(Notice::info(format!(
                    "Using two-step translation via {}",
                    self.registry.label_for_code(pivot)
                )));
            }
            ModelPath::Direct { .. } => {}
        }

        let result = match self.executor.translate(text, &path).await {
            Ok(result) => result,
            Err(e) => {
                warn!("└─ Failed: {}", e);
                notices.push(Notice::error(translation_message(e)));
                return Submission { notices, ..Default::default() };
            }
        };
        info!("│ {}", result.path_display());
        info!("│ Target: {}", result.text);

        session
            .history
            .append(HistoryEntry::new(&source.label, &target.label, &result));

        let audio = match self.synthesizer.synthesize(&result.text, &target.code).await {
            Ok(clip) => {
                info!("└─ {} bytes of audio", clip.len());
                Some(clip)
            }
            Err(e) => {
                warn!("└─ Audio failed: {}", e);
                notices.push(Notice::error(e.to_string()));
                None
            }
        };

        Submission {
            result: Some(result),
            audio,
            notices,
        }
    }
}

fn translation_message(e: PolytalkError) -> String {
    match e {
        PolytalkError::Translation(_) | PolytalkError::PathUnavailable { .. } | PolytalkError::EmptyInput => e.to_string(),
        other => format!("Translation error: {}", other),
    }
}
