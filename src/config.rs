use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::error::{Result, PolytalkError};

fn default_display_limit() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translate: TranslateConfig,
    pub speech: SpeechConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Model inference server endpoint URL
    pub endpoint: String,
    /// Prefix of published model names, completed with "-{source}-{target}"
    pub model_prefix: String,
    /// Language code used as the intermediate step when no direct model exists
    pub pivot_language: String,
    /// HTTP request timeout in seconds (0 waits indefinitely)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Speech engine: Google or Espeak
    pub engine: SpeechEngineKind,
    /// Base URL of the Google translate TTS endpoint
    pub endpoint: String,
    /// Slow speech rate (Google engine only)
    pub slow: bool,
    /// Path to espeak-ng binary
    pub espeak_binary: String,
    /// Directory for transient audio files (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// HTTP request timeout in seconds (0 waits indefinitely)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechEngineKind {
    /// Google translate text-to-speech over HTTP, MP3 output
    Google,
    /// Local espeak-ng process, WAV output
    Espeak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of recent entries shown by the history display
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Initial source language label
    pub source_language: String,
    /// Initial target language label
    pub target_language: String,
    /// Initial dark mode flag
    pub dark_mode: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            source_language: "English".to_string(),
            target_language: "Spanish".to_string(),
            dark_mode: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate: TranslateConfig {
                endpoint: "http://localhost:8080".to_string(),
                model_prefix: "Helsinki-NLP/opus-mt".to_string(),
                pivot_language: "en".to_string(),
                timeout_secs: default_timeout_secs(),
            },
            speech: SpeechConfig {
                engine: SpeechEngineKind::Google,
                endpoint: "https://translate.google.com".to_string(),
                slow: false,
                espeak_binary: "espeak-ng".to_string(),
                temp_dir: None,
                timeout_secs: default_timeout_secs(),
            },
            history: HistoryConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Convert a timeout setting to a duration, `None` meaning no timeout
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PolytalkError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| PolytalkError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PolytalkError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| PolytalkError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
