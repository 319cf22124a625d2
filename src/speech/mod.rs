// Speech synthesis
//
// Engines write audio for a text to a file; the synthesizer owns the transient
// file and hands back the bytes:
// - Google: Google translate text-to-speech over HTTP (MP3)
// - Espeak: local espeak-ng process (WAV)

pub mod google;
pub mod espeak;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{SpeechConfig, SpeechEngineKind};
use crate::error::{PolytalkError, Result};

/// Main trait for text-to-speech engines
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Write the spoken form of `text` in `language` to `path`
    async fn save(&self, text: &str, language: &str, path: &Path) -> Result<()>;

    /// MIME type of the files this engine writes
    fn mime_type(&self) -> &'static str;

    /// File extension including the dot, e.g. ".mp3"
    fn extension(&self) -> &'static str;
}

/// Encoded audio held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioClip {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URI suitable for an inline audio element
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Synthesizes speech through an engine using a scoped temporary file.
///
/// The file is a `NamedTempFile`, removed when it goes out of scope on both
/// the success and the failure path.
pub struct SpeechSynthesizer {
    engine: Box<dyn SpeechEngine>,
    temp_dir: Option<PathBuf>,
}

impl SpeechSynthesizer {
    pub fn new(engine: Box<dyn SpeechEngine>, temp_dir: Option<PathBuf>) -> Self {
        Self { engine, temp_dir }
    }

    pub fn from_config(config: &SpeechConfig) -> Result<Self> {
        let engine = SpeechEngineFactory::create_engine(config)?;
        Ok(Self::new(engine, config.temp_dir.clone()))
    }

    pub async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip> {
        if text.trim().is_empty() {
            return Err(PolytalkError::Synthesis("No text to speak".to_string()));
        }

        let prefix = format!("temp_{}_", language);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(self.engine.extension());

        let temp_file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| PolytalkError::Synthesis(format!("Failed to create temporary audio file: {}", e)))?;

        debug!("Synthesizing {} chars of {} speech to {}", text.chars().count(), language, temp_file.path().display());

        self.engine
            .save(text, language, temp_file.path())
            .await
            .map_err(as_synthesis_error)?;

        let bytes = tokio::fs::read(temp_file.path())
            .await
            .map_err(|e| PolytalkError::Synthesis(format!("Failed to read synthesized audio: {}", e)))?;

        if let Err(e) = temp_file.close() {
            warn!("Failed to remove temporary audio file: {}", e);
        }

        if bytes.is_empty() {
            return Err(PolytalkError::Synthesis("Speech engine produced no audio".to_string()));
        }

        info!("Synthesized {} bytes of {} audio", bytes.len(), language);
        Ok(AudioClip {
            bytes,
            mime_type: self.engine.mime_type().to_string(),
        })
    }
}

fn as_synthesis_error(e: PolytalkError) -> PolytalkError {
    match e {
        PolytalkError::Synthesis(_) => e,
        other => PolytalkError::Synthesis(other.to_string()),
    }
}

/// Factory for creating speech engine instances
pub struct SpeechEngineFactory;

impl SpeechEngineFactory {
    pub fn create_engine(config: &SpeechConfig) -> Result<Box<dyn SpeechEngine>> {
        match config.engine {
            SpeechEngineKind::Google => Ok(Box::new(google::GoogleTtsEngine::new(config)?)),
            SpeechEngineKind::Espeak => Ok(Box::new(espeak::EspeakEngine::new(config))),
        }
    }
}
