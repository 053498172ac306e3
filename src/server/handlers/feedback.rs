use std::sync::Arc;

use axum::extract::State;
use axum_extra::extract::Query;
use serde::Deserialize;

use crate::core::errors::ApiError;
use crate::feedback::DEFAULT_QUESTION;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    /// Every `question` value in order; repeated keys are allowed.
    #[serde(default)]
    pub question: Vec<String>,
}

impl ChatQuery {
    /// Repeated values are joined with `,`; an absent or empty question falls
    /// back to the default phrase.
    pub fn question(&self) -> String {
        let joined = self.question.join(",");
        if joined.is_empty() {
            DEFAULT_QUESTION.to_string()
        } else {
            joined
        }
    }
}

/// `GET /feedback/chat?question=...`: plain-text answer from the chat model.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatQuery>,
) -> Result<String, ApiError> {
    state.feedback.answer(&query.question()).await
}
