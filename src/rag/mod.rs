//! Document storage for retrieval.
//!
//! This module provides:
//! - `VectorStore`: the storage/search interface
//! - `SimpleVectorStore`: in-memory implementation with cosine ranking
//! - `build_vector_store`: picks the backend from configuration

mod factory;
mod simple;
mod store;

pub use factory::build_vector_store;
pub use simple::{SimpleVectorStore, SnapshotEntry};
pub use store::{Document, SearchRequest, SearchRequestBuilder, SimilarityThreshold, VectorStore};
