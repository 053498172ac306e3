//! OpenAI-compatible HTTP clients (`/v1/chat/completions`, `/v1/embeddings`).
//!
//! Works against OpenAI itself and any server speaking the same dialect
//! (Ollama, LM Studio, vLLM).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::{ChatClient, EmbeddingModel};
use super::types::ChatRequest;
use crate::core::config::settings::LlmSettings;
use crate::core::errors::ApiError;

#[derive(Clone)]
struct OpenAiEndpoint {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiEndpoint {
    fn from_settings(settings: &LlmSettings) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ApiError::internal)?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            client,
        })
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await.map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "{} returned {}: {}",
                path, status, text
            )));
        }

        res.json().await.map_err(ApiError::upstream)
    }
}

#[derive(Clone)]
pub struct OpenAiChatClient {
    endpoint: OpenAiEndpoint,
    model: String,
}

impl OpenAiChatClient {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ApiError> {
        Ok(Self {
            endpoint: OpenAiEndpoint::from_settings(settings)?,
            model: settings.chat_model.clone(),
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature { obj.insert("temperature".to_string(), json!(t)); }
            if let Some(t) = request.max_tokens { obj.insert("max_tokens".to_string(), json!(t)); }
        }

        let payload = self.endpoint.post_json("/v1/chat/completions", &body).await?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::Upstream("Chat response did not contain message content".to_string())
            })
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct OpenAiEmbeddingModel {
    endpoint: OpenAiEndpoint,
    model: String,
}

impl OpenAiEmbeddingModel {
    /// Fails when no embedding model is configured.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ApiError> {
        let model = settings.embedding_model_name().ok_or_else(|| {
            ApiError::BadRequest("llm.embedding_model is not configured".to_string())
        })?;

        Ok(Self {
            endpoint: OpenAiEndpoint::from_settings(settings)?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiEmbeddingModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": self.model,
            "input": inputs,
        });

        let payload = self.endpoint.post_json("/v1/embeddings", &body).await?;
        let mut response: EmbeddingResponse =
            serde_json::from_value(payload).map_err(ApiError::upstream)?;

        if response.data.len() != inputs.len() {
            return Err(ApiError::Upstream(format!(
                "Embedding count mismatch: sent {}, received {}",
                inputs.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|item| item.index.unwrap_or(usize::MAX));
        Ok(response.data.into_iter().map(|item| item.embedding).collect())
    }
}
