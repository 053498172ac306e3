use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[source] anyhow::Error),

    #[error("Failed to initialize embedding model: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Failed to initialize vector store: {0}")]
    VectorStore(#[source] anyhow::Error),

    #[error("No vector store available: app.ai.vectorstore is {0}, expected \"simple\"")]
    MissingVectorStore(String),

    #[error("Failed to load prompt template: {0}")]
    Prompt(#[source] anyhow::Error),

    #[error("Failed to initialize chat client: {0}")]
    Llm(#[source] anyhow::Error),
}
