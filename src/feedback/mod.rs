//! Feedback question answering.
//!
//! - `FeedbackService`: fetches every stored feedback entry (up to `TOP_K`),
//!   renders the feedback prompt and asks the chat model.

mod service;

pub use service::{FeedbackService, DEFAULT_QUESTION, DOCUMENT_SEPARATOR, TOP_K, WILDCARD_QUERY};
