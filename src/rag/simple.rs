//! In-memory vector store.
//!
//! Documents live in a `Vec` guarded by an async `RwLock`, so concurrent
//! searches only take shared locks. Search is brute-force cosine similarity
//! over every stored embedding.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::store::{Document, SearchRequest, VectorStore};
use crate::core::errors::ApiError;
use crate::llm::EmbeddingModel;
use crate::vector_math::rank_descending_by_cosine;

/// Text embedded at startup to compare the model's output length with the
/// vectors already in the store.
const DIMENSION_CHECK_QUERY: &str = "*";

struct StoredEntry {
    document: Document,
    embedding: Vec<f32>,
}

/// One entry of an on-disk snapshot. A missing embedding is computed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

pub struct SimpleVectorStore {
    embedding_model: Arc<dyn EmbeddingModel>,
    entries: RwLock<Vec<StoredEntry>>,
}

pub struct SimpleVectorStoreBuilder {
    embedding_model: Arc<dyn EmbeddingModel>,
}

impl SimpleVectorStoreBuilder {
    pub fn build(self) -> SimpleVectorStore {
        SimpleVectorStore {
            embedding_model: self.embedding_model,
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl SimpleVectorStore {
    pub fn builder(embedding_model: Arc<dyn EmbeddingModel>) -> SimpleVectorStoreBuilder {
        SimpleVectorStoreBuilder { embedding_model }
    }

    /// Loads a JSON snapshot, appending to (or replacing by id in) the store.
    pub async fn load(&self, path: &Path) -> Result<usize, ApiError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApiError::Internal(format!("Failed to read snapshot {}: {}", path.display(), e))
        })?;
        let snapshot: Vec<SnapshotEntry> = serde_json::from_str(&contents).map_err(|e| {
            ApiError::Internal(format!("Invalid snapshot {}: {}", path.display(), e))
        })?;

        let total = snapshot.len();
        let mut pending = Vec::new();
        let mut embedded = Vec::new();
        for entry in snapshot {
            let document = Document {
                id: entry.id,
                text: entry.text,
                metadata: entry.metadata,
                score: None,
            };
            match entry.embedding {
                Some(embedding) if !embedding.is_empty() => {
                    embedded.push(StoredEntry { document, embedding })
                }
                _ => pending.push(document),
            }
        }

        {
            let mut entries = self.entries.write().await;
            check_dimensions(&entries, &embedded)?;
            for entry in embedded {
                upsert(&mut entries, entry);
            }
        }

        if !pending.is_empty() {
            tracing::info!("Embedding {} snapshot documents without vectors", pending.len());
            self.add(pending).await?;
        }

        Ok(total)
    }

    /// Fails when the embedding model produces vectors of a different length
    /// than the stored ones, e.g. a snapshot written with another model.
    pub async fn check_embedding_dimension(&self) -> Result<(), ApiError> {
        let stored = self
            .entries
            .read()
            .await
            .first()
            .map(|entry| entry.embedding.len());
        let Some(stored) = stored else {
            return Ok(());
        };

        let query = self.embedding_model.embed_one(DIMENSION_CHECK_QUERY).await?;
        if query.len() != stored {
            return Err(ApiError::Internal(format!(
                "Embedding model {} produces {} dimensions but stored vectors have {}",
                self.embedding_model.name(),
                query.len(),
                stored
            )));
        }
        Ok(())
    }

    /// Writes every stored document with its embedding as a JSON snapshot.
    pub async fn save(&self, path: &Path) -> Result<(), ApiError> {
        let snapshot: Vec<SnapshotEntry> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .map(|entry| SnapshotEntry {
                    id: entry.document.id.clone(),
                    text: entry.document.text.clone(),
                    metadata: entry.document.metadata.clone(),
                    embedding: Some(entry.embedding.clone()),
                })
                .collect()
        };

        let json = serde_json::to_string_pretty(&snapshot).map_err(ApiError::internal)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ApiError::internal)?;
        }
        tokio::fs::write(path, json).await.map_err(ApiError::internal)
    }
}

/// Every embedding in the store shares one length: the length of the stored
/// entries, or of the first incoming one when the store is empty.
fn check_dimensions(entries: &[StoredEntry], incoming: &[StoredEntry]) -> Result<(), ApiError> {
    let Some(expected) = entries
        .first()
        .or_else(|| incoming.first())
        .map(|entry| entry.embedding.len())
    else {
        return Ok(());
    };

    match incoming.iter().find(|entry| entry.embedding.len() != expected) {
        Some(entry) => Err(ApiError::Internal(format!(
            "Embedding for document {} has {} dimensions, expected {}",
            entry.document.id,
            entry.embedding.len(),
            expected
        ))),
        None => Ok(()),
    }
}

fn upsert(entries: &mut Vec<StoredEntry>, entry: StoredEntry) {
    match entries
        .iter_mut()
        .find(|existing| existing.document.id == entry.document.id)
    {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

#[async_trait]
impl VectorStore for SimpleVectorStore {
    async fn add(&self, documents: Vec<Document>) -> Result<(), ApiError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedding_model.embed(&texts).await?;
        if embeddings.len() != documents.len() {
            return Err(ApiError::Upstream(format!(
                "Embedding model {} returned {} vectors for {} documents",
                self.embedding_model.name(),
                embeddings.len(),
                documents.len()
            )));
        }

        let incoming: Vec<StoredEntry> = documents
            .into_iter()
            .zip(embeddings)
            .map(|(mut document, embedding)| {
                document.score = None;
                StoredEntry { document, embedding }
            })
            .collect();

        let mut entries = self.entries.write().await;
        check_dimensions(&entries, &incoming)?;
        for entry in incoming {
            upsert(&mut entries, entry);
        }
        Ok(())
    }

    async fn similarity_search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApiError> {
        if request.top_k == 0 || self.entries.read().await.is_empty() {
            return Ok(Vec::new());
        }

        // Embed before locking so writers are never blocked on the remote call.
        let query_embedding = self.embedding_model.embed_one(&request.query).await?;

        let entries = self.entries.read().await;
        let candidates: Vec<&[f32]> = entries.iter().map(|e| e.embedding.as_slice()).collect();
        let ranked = rank_descending_by_cosine(&query_embedding, &candidates)
            .map_err(|e| ApiError::Internal(format!("Similarity search failed: {}", e)))?;

        let results = ranked
            .into_iter()
            .filter(|(_, score)| request.threshold.accepts(*score))
            .take(request.top_k)
            .map(|(idx, score)| {
                let mut document = entries[idx].document.clone();
                document.score = Some(score);
                document
            })
            .collect();

        Ok(results)
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, ApiError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| !ids.contains(&entry.document.id));
        Ok(before - entries.len())
    }

    async fn count(&self) -> Result<usize, ApiError> {
        Ok(self.entries.read().await.len())
    }
}
