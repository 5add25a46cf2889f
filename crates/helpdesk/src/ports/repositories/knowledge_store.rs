//! Knowledge Store Port
//!
//! Vector storage behind the retrieval tool.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, KnowledgeChunk, ScoredChunk};

/// Repository interface for knowledge base chunks
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Add chunks with their embedding vectors (same order, same length)
    async fn add(
        &self,
        chunks: Vec<KnowledgeChunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<(), DomainError>;

    /// Search chunks by semantic similarity, best first
    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError>;

    /// Number of stored chunks
    async fn count(&self) -> Result<usize, DomainError>;
}
