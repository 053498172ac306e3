pub mod context;
pub mod core;
pub mod feedback;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
pub mod vector_math;
