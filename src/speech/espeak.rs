use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::config::SpeechConfig;
use crate::error::{PolytalkError, Result};
use super::SpeechEngine;

/// Offline engine driving a local espeak-ng binary
pub struct EspeakEngine {
    binary_path: String,
}

impl EspeakEngine {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            binary_path: config.espeak_binary.clone(),
        }
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    async fn save(&self, text: &str, language: &str, path: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("-v").arg(language)
           .arg("-w").arg(path)
           .arg("--")
           .arg(text);

        debug!("Executing espeak command: {:?}", cmd);

        let output = cmd.output()
            .await
            .map_err(|e| PolytalkError::Synthesis(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PolytalkError::Synthesis(format!(
                "espeak failed for voice {}: {}", language, stderr.trim()
            )));
        }

        Ok(())
    }

    fn mime_type(&self) -> &'static str {
        "audio/wav"
    }

    fn extension(&self) -> &'static str {
        ".wav"
    }
}
