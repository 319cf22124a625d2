// Model inference server backend
//
// GET  /models/{name}           -> {"max_length", "eos_token_id"} or 404
// POST /models/{name}/tokenize  {"text"}                        -> {"ids"}
// POST /models/{name}/generate  {"input_ids"}                   -> {"output_ids"}
// POST /models/{name}/decode    {"ids", "skip_special_tokens"}  -> {"text"}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{TranslateConfig, timeout_from_secs};
use crate::error::{Result, PolytalkError};
use super::{ModelPair, ModelProvider, Seq2SeqModel, Tokenizer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub max_length: usize,
    #[serde(default)]
    pub eos_token_id: Option<u32>,
}

#[derive(Debug, Serialize)]
struct TokenizeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenizeResponse {
    ids: Vec<u32>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    input_ids: &'a [u32],
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    output_ids: Vec<u32>,
}

#[derive(Debug, Serialize)]
struct DecodeRequest<'a> {
    ids: &'a [u32],
    skip_special_tokens: bool,
}

#[derive(Debug, Deserialize)]
struct DecodeResponse {
    text: String,
}

/// Provider loading model pairs from an inference server
pub struct HttpModelProvider {
    client: Client,
    endpoint: String,
}

impl HttpModelProvider {
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent("polytalk/0.1.0");
        if let Some(timeout) = timeout_from_secs(config.timeout_secs) {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ModelProvider for HttpModelProvider {
    async fn load(&self, name: &str) -> Result<ModelPair> {
        let url = format!("{}/models/{}", self.endpoint, name);
        debug!("Loading model info from: {}", url);

        let load_error = |reason: String| PolytalkError::ModelLoad {
            model: name.to_string(),
            reason,
        };

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| load_error(format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(load_error("model not published".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(load_error(format!("server returned {}: {}", status, body)));
        }

        let info: ModelInfo = response.json().await
            .map_err(|e| load_error(format!("invalid model info: {}", e)))?;

        if info.max_length == 0 {
            return Err(load_error("model reports zero max_length".to_string()));
        }

        info!("Loaded model {} (max_length {})", name, info.max_length);

        let handle = Arc::new(RemoteModel {
            client: self.client.clone(),
            base_url: url,
            info,
        });

        Ok(ModelPair {
            name: name.to_string(),
            tokenizer: handle.clone(),
            model: handle,
        })
    }
}

/// One loaded model on the server; serves as both tokenizer and model
struct RemoteModel {
    client: Client,
    base_url: String,
    info: ModelInfo,
}

impl RemoteModel {
    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(&self, action: &str, body: &B) -> Result<R> {
        let url = format!("{}/{}", self.base_url, action);
        debug!("Sending {} request to: {}", action, url);

        let response = self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PolytalkError::Translation(format!("{} request failed: {}", action, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PolytalkError::Translation(format!(
                "Model server {} error {}: {}", action, status, error_text
            )));
        }

        response.json().await
            .map_err(|e| PolytalkError::Translation(format!("Failed to parse {} response: {}", action, e)))
    }
}

#[async_trait]
impl Tokenizer for RemoteModel {
    async fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let response: TokenizeResponse = self.post("tokenize", &TokenizeRequest { text }).await?;
        Ok(response.ids)
    }

    async fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        let response: DecodeResponse = self
            .post("decode", &DecodeRequest { ids, skip_special_tokens })
            .await?;
        Ok(response.text)
    }

    fn max_length(&self) -> usize {
        self.info.max_length
    }

    fn eos_token_id(&self) -> Option<u32> {
        self.info.eos_token_id
    }
}

#[async_trait]
impl Seq2SeqModel for RemoteModel {
    async fn generate(&self, input_ids: &[u32]) -> Result<Vec<u32>> {
        let response: GenerateResponse = self
            .post("generate", &GenerateRequest { input_ids })
            .await?;
        Ok(response.output_ids)
    }
}
