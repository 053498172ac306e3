//! Prompt construction.
//!
//! Provides `{name}` placeholder templates loaded from disk.

pub mod prompt;

pub use prompt::PromptTemplate;
