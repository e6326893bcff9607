//! Associative memory interface
//!
//! The selector only reads from memory. Indexing, embeddings and similarity
//! ranking belong to the store implementation.

pub mod store;

pub use store::{InMemoryAssociativeMemory, MemoryRecord};

use crate::Result;
use async_trait::async_trait;

/// Store of timestamped text records retrievable by similarity
#[async_trait]
pub trait AssociativeMemory: Send + Sync {
    /// Return up to `limit` memories most similar to `query`, most relevant
    /// first. With `add_time` each memory is rendered `"[<time>] <text>"`.
    async fn retrieve_associative(
        &self,
        query: &str,
        limit: usize,
        add_time: bool,
    ) -> Result<Vec<String>>;
}
