use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::{EmbeddingProvider, GenerationProvider};
use crate::core::config::ProviderSettings;
use crate::core::errors::RagError;

/// Client for any OpenAI-compatible endpoint (LM Studio, Ollama, hosted APIs).
/// Implements both provider traits; constructed once at startup and injected.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    base_url: String,
    api_key: Option<String>,
    embedding_model: String,
    generation_model: String,
    client: Client,
}

impl OpenAiCompatClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| RagError::Internal(err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            embedding_model: settings.embedding_model.clone(),
            generation_model: settings.generation_model.clone(),
            client,
        })
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.post(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Deserialize)]
struct EmbeddingObject {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.embedding_model,
            "input": text,
        });

        let res = self
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::EmbeddingService(err.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            return Err(RagError::EmbeddingService(format!("{status}: {detail}")));
        }

        let payload: EmbeddingsResponse = res
            .json()
            .await
            .map_err(|err| RagError::EmbeddingService(err.to_string()))?;

        payload
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| RagError::EmbeddingService("empty embeddings response".to_string()))
    }
}

#[async_trait]
impl GenerationProvider for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn generate(&self, prompt: &str) -> Result<String, RagError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.generation_model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": false,
            "temperature": 0.2,
        });

        let res = self
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::GenerationService(err.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            return Err(RagError::GenerationService(format!("{status}: {detail}")));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|err| RagError::GenerationService(err.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if content.is_empty() {
            return Err(RagError::GenerationService(
                "empty completion response".to_string(),
            ));
        }
        Ok(content)
    }
}
