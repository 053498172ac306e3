use std::collections::HashMap;
use std::sync::Arc;

use crate::context::prompt::PromptTemplate;
use crate::core::config::settings::LlmSettings;
use crate::core::errors::ApiError;
use crate::llm::{ChatClient, ChatMessage, ChatRequest};
use crate::rag::{Document, SearchRequest, VectorStore};

/// Maximum number of documents placed in the prompt.
pub const TOP_K: usize = 50;

pub const WILDCARD_QUERY: &str = "*";

pub const DOCUMENT_SEPARATOR: &str = "---\n";

pub const DEFAULT_QUESTION: &str = "pick a random feedback from the list?";

/// Answers questions about the stored feedback by handing all of it to the chat model.
#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatClient>,
    prompt: Arc<PromptTemplate>,
    llm: LlmSettings,
}

impl FeedbackService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatClient>,
        prompt: Arc<PromptTemplate>,
        llm: LlmSettings,
    ) -> Self {
        let placeholders = prompt.placeholders();
        for expected in ["documents", "question"] {
            if !placeholders.contains(&expected) {
                tracing::warn!("Feedback prompt has no {{{}}} placeholder", expected);
            }
        }

        Self {
            store,
            chat,
            prompt,
            llm,
        }
    }

    /// The retrieval request is the same for every question: an unranked bulk fetch.
    pub fn search_request() -> SearchRequest {
        SearchRequest::builder()
            .query(WILDCARD_QUERY)
            .top_k(TOP_K)
            .similarity_threshold_all()
            .build()
    }

    pub fn join_documents(documents: &[Document]) -> String {
        documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR)
    }

    pub fn render_prompt(&self, documents: &str, question: &str) -> Result<String, ApiError> {
        let params = HashMap::from([("documents", documents), ("question", question)]);
        self.prompt.render(&params)
    }

    pub async fn answer(&self, question: &str) -> Result<String, ApiError> {
        tracing::info!("Asking a question: {}", question);

        let found = self.store.similarity_search(&Self::search_request()).await?;
        tracing::info!("Loading {} documents from the vector store", found.len());

        let documents = Self::join_documents(&found);
        tracing::debug!("Documents: \n {} \n\n", documents);

        let prompt = self.render_prompt(&documents, question)?;
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]).with_settings(&self.llm);

        self.chat.chat(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::SimilarityThreshold;

    #[test]
    fn search_request_is_a_fixed_bulk_fetch() {
        let request = FeedbackService::search_request();

        assert_eq!(request.query, "*");
        assert_eq!(request.top_k, 50);
        assert_eq!(request.threshold, SimilarityThreshold::AcceptAll);
    }

    #[test]
    fn join_places_separator_between_entries_only() {
        let docs = vec![
            Document::with_id("1", "A"),
            Document::with_id("2", "B"),
            Document::with_id("3", "C"),
        ];

        assert_eq!(FeedbackService::join_documents(&docs), "A---\nB---\nC");
        assert_eq!(FeedbackService::join_documents(&docs[..1]), "A");
        assert_eq!(FeedbackService::join_documents(&[]), "");
    }
}
