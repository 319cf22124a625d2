// Google translate text-to-speech engine
//
// The endpoint accepts at most 100 characters per request, so text is split into
// chunks (sentence punctuation first, then whitespace) and the returned MP3
// segments are appended to one file.

use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::{SpeechConfig, timeout_from_secs};
use crate::error::{PolytalkError, Result};
use super::SpeechEngine;

pub const MAX_CHUNK_CHARS: usize = 100;

/// Language codes accepted by the endpoint
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "ar", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "eo", "es",
    "et", "fi", "fr", "gu", "hi", "hr", "hu", "hy", "id", "is", "it", "iw", "ja", "jw",
    "km", "kn", "ko", "la", "lv", "mk", "ml", "mr", "my", "ne", "nl", "no", "pl", "pt",
    "ro", "ru", "si", "sk", "sq", "sr", "su", "sv", "sw", "ta", "te", "th", "tl", "tr",
    "uk", "ur", "vi", "zh", "zh-CN", "zh-TW",
];

const SENTENCE_BREAKS: &[char] = &[
    '.', '!', '?', ';', ':', ',', '。', '！', '？', '；', '：', '，', '、', '\n',
];

pub struct GoogleTtsEngine {
    client: Client,
    endpoint: String,
    slow: bool,
}

impl GoogleTtsEngine {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent("polytalk/0.1.0");
        if let Some(timeout) = timeout_from_secs(config.timeout_secs) {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            slow: config.slow,
        })
    }

    async fn fetch_chunk(&self, chunk: &str, language: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let url = format!("{}/translate_tts", self.endpoint);
        let speed = if self.slow { "0.3" } else { "1" };
        let query = [
            ("ie", "UTF-8".to_string()),
            ("q", chunk.to_string()),
            ("tl", language.to_string()),
            ("client", "tw-ob".to_string()),
            ("ttsspeed", speed.to_string()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("textlen", chunk.chars().count().to_string()),
        ];

        debug!("Requesting speech chunk {}/{} from: {}", idx + 1, total, url);

        let response = self.client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| PolytalkError::Synthesis(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PolytalkError::Synthesis(format!(
                "Speech API error {}: {}", status, error_text
            )));
        }

        let bytes = response.bytes().await
            .map_err(|e| PolytalkError::Synthesis(format!("Failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechEngine for GoogleTtsEngine {
    async fn save(&self, text: &str, language: &str, path: &Path) -> Result<()> {
        if !SUPPORTED_LANGUAGES.contains(&language) {
            return Err(PolytalkError::Synthesis(format!("Language not supported: {}", language)));
        }

        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(PolytalkError::Synthesis("No text to speak".to_string()));
        }

        let mut file = tokio::fs::File::create(path).await?;
        for (idx, chunk) in chunks.iter().enumerate() {
            let audio = self.fetch_chunk(chunk, language, idx, chunks.len()).await?;
            file.write_all(&audio).await?;
        }
        file.flush().await?;

        Ok(())
    }

    fn mime_type(&self) -> &'static str {
        "audio/mp3"
    }

    fn extension(&self) -> &'static str {
        ".mp3"
    }
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Pieces end at sentence punctuation where possible; pieces still too long are
/// split on whitespace, and single words longer than the limit are cut. Adjacent
/// short pieces are merged back while they fit.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if SENTENCE_BREAKS.contains(&ch) {
            pieces.push(std::mem::take(&mut current));
        }
    }
    pieces.push(current);

    let mut bounded = Vec::new();
    for piece in pieces {
        let piece = piece.trim();
        if piece.is_empty() || piece.chars().all(|c| SENTENCE_BREAKS.contains(&c)) {
            continue;
        }
        if piece.chars().count() <= max_chars {
            bounded.push(piece.to_string());
        } else {
            bounded.extend(split_on_whitespace(piece, max_chars));
        }
    }

    let mut chunks: Vec<String> = Vec::new();
    for piece in bounded {
        match chunks.last_mut() {
            Some(last) if last.chars().count() + 1 + piece.chars().count() <= max_chars => {
                last.push(' ');
                last.push_str(&piece);
            }
            _ => chunks.push(piece),
        }
    }
    chunks
}

fn split_on_whitespace(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            chunks.push(head);
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine_for(server: &MockServer) -> GoogleTtsEngine {
        let mut config = Config::default().speech;
        config.endpoint = server.uri();
        GoogleTtsEngine::new(&config).unwrap()
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(split_text("Hola mundo", 100), vec!["Hola mundo"]);
        assert!(split_text("  ", 100).is_empty());
    }

    #[test]
    fn test_split_prefers_punctuation() {
        let chunks = split_text("One two three. Four five six.", 16);
        assert_eq!(chunks, vec!["One two three.", "Four five six."]);
    }

    #[test]
    fn test_split_respects_limit() {
        let text = "word ".repeat(60);
        let chunks = split_text(&text, 100);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
        assert_eq!(chunks.join(" ").split_whitespace().count(), 60);
    }

    #[test]
    fn test_long_word_is_cut() {
        let word = "x".repeat(25);
        let chunks = split_text(&word, 10);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[tokio::test]
    async fn test_save_concatenates_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "es"))
            .and(query_param("client", "tw-ob"))
            .and(query_param("idx", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"AAA".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("idx", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"BBB".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("speech.mp3");
        let text = format!("{}. {}.", "a".repeat(80), "b".repeat(80));

        engine_for(&server).save(&text, "es", &out).await.unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"AAABBB".to_vec());
    }

    #[tokio::test]
    async fn test_unsupported_language_rejected_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = engine_for(&server)
            .save("hello", "xx", &dir.path().join("out.mp3"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Language not supported: xx"));
    }

    #[tokio::test]
    async fn test_service_error_is_synthesis_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        match engine_for(&server).save("hello", "en", &dir.path().join("out.mp3")).await {
            Err(PolytalkError::Synthesis(msg)) => assert!(msg.contains("503")),
            other => panic!("expected Synthesis error, got {:?}", other),
        }
    }
}
