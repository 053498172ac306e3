//! VectorStore trait — abstract interface for document stores.
//!
//! The in-process implementation is `SimpleVectorStore` in the `simple` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::errors::ApiError;

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// The text content.
    pub text: String,
    /// Free-form metadata, possibly empty.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Similarity to the query, set on search results only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Document {
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Map::new(),
            score: None,
        }
    }
}

/// Minimum similarity a result must reach to be returned.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SimilarityThreshold {
    /// No filtering: every candidate is eligible.
    #[default]
    AcceptAll,
    Min(f32),
}

impl SimilarityThreshold {
    pub fn accepts(&self, score: f32) -> bool {
        match self {
            SimilarityThreshold::AcceptAll => true,
            SimilarityThreshold::Min(min) => score >= *min,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    pub threshold: SimilarityThreshold,
}

impl SearchRequest {
    pub const DEFAULT_TOP_K: usize = 4;

    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    query: String,
    top_k: usize,
    threshold: SimilarityThreshold,
}

impl Default for SearchRequestBuilder {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: SearchRequest::DEFAULT_TOP_K,
            threshold: SimilarityThreshold::AcceptAll,
        }
    }
}

impl SearchRequestBuilder {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn similarity_threshold(mut self, min: f32) -> Self {
        self.threshold = SimilarityThreshold::Min(min);
        self
    }

    pub fn similarity_threshold_all(mut self) -> Self {
        self.threshold = SimilarityThreshold::AcceptAll;
        self
    }

    pub fn build(self) -> SearchRequest {
        SearchRequest {
            query: self.query,
            top_k: self.top_k,
            threshold: self.threshold,
        }
    }
}

/// Abstract trait for vector store backends.
///
/// Stores must be safe for concurrent readers.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embeds and stores documents. An existing id is replaced.
    async fn add(&self, documents: Vec<Document>) -> Result<(), ApiError>;

    /// Returns up to `top_k` documents passing the threshold, nearest first.
    async fn similarity_search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApiError>;

    /// Deletes documents by id, returning how many were removed.
    async fn delete(&self, ids: &[String]) -> Result<usize, ApiError>;

    async fn count(&self) -> Result<usize, ApiError>;
}
