use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::ApiError;

/// Value of `app.ai.vectorstore` that selects the in-memory store.
pub const SIMPLE_VECTOR_STORE: &str = "simple";

/// Typed view over the merged `config.yml` + `secrets.yaml` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub app: AppSettings,
    pub llm: LlmSettings,
    pub vectorstore: VectorStoreSettings,
    pub prompts: PromptSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub ai: AiSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub vectorstore: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl LlmSettings {
    /// The embedding model name; blank counts as not configured.
    pub fn embedding_model_name(&self) -> Option<&str> {
        self.embedding_model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: Some("text-embedding-3-small".to_string()),
            temperature: None,
            max_tokens: None,
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    pub simple: SimpleStoreSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleStoreSettings {
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub feedback: PathBuf,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            feedback: PathBuf::from("prompts/feedback.st"),
        }
    }
}

impl Settings {
    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        serde_json::from_value(value.clone()).map_err(|e| {
            ApiError::BadRequest(format!("Invalid config: {}", e))
        })
    }

    /// The configured vector store backend, trimmed and lowercased.
    pub fn vector_store_backend(&self) -> Option<String> {
        self.app
            .ai
            .vectorstore
            .as_deref()
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
    }

    pub fn uses_simple_vector_store(&self) -> bool {
        self.vector_store_backend().as_deref() == Some(SIMPLE_VECTOR_STORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings = Settings::from_value(&json!({})).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.prompts.feedback, PathBuf::from("prompts/feedback.st"));
        assert_eq!(settings.llm.embedding_model_name(), Some("text-embedding-3-small"));
        assert!(settings.vector_store_backend().is_none());
        assert!(!settings.uses_simple_vector_store());
    }

    #[test]
    fn vector_store_selection_is_case_insensitive() {
        let settings =
            Settings::from_value(&json!({ "app": { "ai": { "vectorstore": " Simple " } } }))
                .unwrap();
        assert!(settings.uses_simple_vector_store());

        let settings =
            Settings::from_value(&json!({ "app": { "ai": { "vectorstore": "redis" } } }))
                .unwrap();
        assert!(!settings.uses_simple_vector_store());
        assert_eq!(settings.vector_store_backend().as_deref(), Some("redis"));
    }

    #[test]
    fn blank_embedding_model_counts_as_missing() {
        let settings =
            Settings::from_value(&json!({ "llm": { "embedding_model": "" } })).unwrap();
        assert!(settings.llm.embedding_model_name().is_none());

        let settings =
            Settings::from_value(&json!({ "llm": { "embedding_model": null } })).unwrap();
        assert!(settings.llm.embedding_model_name().is_none());
    }
}
