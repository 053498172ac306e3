use std::sync::Arc;

use super::simple::SimpleVectorStore;
use super::store::VectorStore;
use crate::core::config::{AppPaths, Settings};
use crate::core::errors::ApiError;
use crate::llm::EmbeddingModel;
use crate::state::error::InitializationError;

/// Builds the vector store selected by `app.ai.vectorstore`.
///
/// Returns `Ok(None)` when the selection is anything other than `simple`; the
/// embedding model is only requested when a store is actually built.
pub async fn build_vector_store<F>(
    settings: &Settings,
    paths: &AppPaths,
    embedding_model: F,
) -> Result<Option<Arc<dyn VectorStore>>, InitializationError>
where
    F: FnOnce() -> Result<Arc<dyn EmbeddingModel>, ApiError>,
{
    if !settings.uses_simple_vector_store() {
        tracing::info!(
            "Simple vector store disabled (app.ai.vectorstore = {:?})",
            settings.vector_store_backend()
        );
        return Ok(None);
    }

    let embedding_model =
        embedding_model().map_err(|e| InitializationError::Embedding(e.into()))?;
    let store = SimpleVectorStore::builder(embedding_model.clone()).build();

    if let Some(snapshot) = &settings.vectorstore.simple.snapshot_path {
        let path = paths.resolve(snapshot);
        let loaded = store
            .load(&path)
            .await
            .map_err(|e| InitializationError::VectorStore(e.into()))?;
        store
            .check_embedding_dimension()
            .await
            .map_err(|e| InitializationError::VectorStore(e.into()))?;
        tracing::info!("Loaded {} documents from {}", loaded, path.display());
    }

    tracing::info!(
        "Simple vector store ready (embedding model: {})",
        embedding_model.name()
    );
    Ok(Some(Arc::new(store)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct UnitEmbedding;

    #[async_trait]
    impl EmbeddingModel for UnitEmbedding {
        fn name(&self) -> &str {
            "unit"
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
            Ok(inputs.iter().map(|_| vec![1.0]).collect())
        }
    }

    fn unit_model() -> Result<Arc<dyn EmbeddingModel>, ApiError> {
        Ok(Arc::new(UnitEmbedding))
    }

    fn settings(value: serde_json::Value) -> Settings {
        Settings::from_value(&value).unwrap()
    }

    fn temp_paths() -> (tempfile::TempDir, AppPaths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::from_dirs(tmp.path().to_path_buf(), tmp.path().to_path_buf());
        (tmp, paths)
    }

    #[tokio::test]
    async fn simple_selection_builds_an_empty_store() {
        let (_tmp, paths) = temp_paths();
        let settings = settings(json!({ "app": { "ai": { "vectorstore": "simple" } } }));

        let store = build_vector_store(&settings, &paths, unit_model)
            .await
            .unwrap()
            .expect("store should be built");

        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn other_selections_build_nothing_and_skip_embedding() {
        let (_tmp, paths) = temp_paths();

        for value in [json!({}), json!({ "app": { "ai": { "vectorstore": "redis" } } })] {
            let store = build_vector_store(&settings(value), &paths, || {
                panic!("embedding model must not be requested")
            })
            .await
            .unwrap();
            assert!(store.is_none());
        }
    }

    #[tokio::test]
    async fn missing_embedding_model_is_fatal() {
        let (_tmp, paths) = temp_paths();
        let settings = settings(json!({ "app": { "ai": { "vectorstore": "simple" } } }));

        let result = build_vector_store(&settings, &paths, || {
            Err(ApiError::BadRequest("llm.embedding_model is not configured".to_string()))
        })
        .await;

        assert!(matches!(result, Err(InitializationError::Embedding(_))));
    }

    #[tokio::test]
    async fn snapshot_is_loaded_relative_to_project_root() {
        let (tmp, paths) = temp_paths();
        std::fs::write(
            tmp.path().join("seed.json"),
            r#"[{"id": "a", "text": "A"}, {"id": "b", "text": "B", "embedding": [1.0]}]"#,
        )
        .unwrap();
        let settings = settings(json!({
            "app": { "ai": { "vectorstore": "simple" } },
            "vectorstore": { "simple": { "snapshot_path": "seed.json" } }
        }));

        let store = build_vector_store(&settings, &paths, unit_model)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn snapshot_from_another_model_is_fatal() {
        let (tmp, paths) = temp_paths();
        std::fs::write(
            tmp.path().join("seed.json"),
            r#"[{"id": "a", "text": "A", "embedding": [1.0, 0.0]}]"#,
        )
        .unwrap();
        let settings = settings(json!({
            "app": { "ai": { "vectorstore": "simple" } },
            "vectorstore": { "simple": { "snapshot_path": "seed.json" } }
        }));

        let result = build_vector_store(&settings, &paths, unit_model).await;

        assert!(matches!(result, Err(InitializationError::VectorStore(_))));
    }

    #[tokio::test]
    async fn unreadable_snapshot_is_fatal() {
        let (_tmp, paths) = temp_paths();
        let settings = settings(json!({
            "app": { "ai": { "vectorstore": "simple" } },
            "vectorstore": { "simple": { "snapshot_path": "missing.json" } }
        }));

        let result = build_vector_store(&settings, &paths, unit_model).await;

        assert!(matches!(result, Err(InitializationError::VectorStore(_))));
    }
}
