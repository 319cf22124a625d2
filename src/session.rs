use crate::config::SessionConfig;
use crate::error::Result;
use crate::history::SessionHistory;
use crate::language::{Language, LanguageRegistry};

/// Per-session state handed to the workflow: current selections, display
/// preference and the session's translation history
#[derive(Debug, Clone)]
pub struct Session {
    source: Language,
    target: Language,
    pub dark_mode: bool,
    pub history: SessionHistory,
}

impl Session {
    pub fn new(registry: &LanguageRegistry, source_label: &str, target_label: &str) -> Result<Self> {
        Ok(Self {
            source: registry.lookup(source_label)?.clone(),
            target: registry.lookup(target_label)?.clone(),
            dark_mode: false,
            history: SessionHistory::new(),
        })
    }

    pub fn from_config(registry: &LanguageRegistry, config: &SessionConfig) -> Result<Self> {
        let mut session = Self::new(registry, &config.source_language, &config.target_language)?;
        session.dark_mode = config.dark_mode;
        Ok(session)
    }

    pub fn source(&self) -> &Language {
        &self.source
    }

    pub fn target(&self) -> &Language {
        &self.target
    }

    pub fn set_source(&mut self, registry: &LanguageRegistry, label: &str) -> Result<()> {
        self.source = registry.lookup(label)?.clone();
        Ok(())
    }

    pub fn set_target(&mut self, registry: &LanguageRegistry, label: &str) -> Result<()> {
        self.target = registry.lookup(label)?.clone();
        Ok(())
    }

    /// Exchange source and target selections
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}
