pub mod openai;
pub mod provider;
pub mod types;

pub use openai::{OpenAiChatClient, OpenAiEmbeddingModel};
pub use provider::{ChatClient, EmbeddingModel};
pub use types::{ChatMessage, ChatRequest};
