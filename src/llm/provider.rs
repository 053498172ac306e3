use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::ApiError;

/// Sends a composed conversation to a chat model and returns the full reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError>;
}

/// Turns texts into embedding vectors, one per input, in input order.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;

    async fn embed_one(&self, input: &str) -> Result<Vec<f32>, ApiError> {
        self.embed(&[input.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Upstream("Embedding model returned no vectors".to_string()))
    }
}
