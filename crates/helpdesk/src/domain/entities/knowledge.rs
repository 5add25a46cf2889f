//! Knowledge - Chunks of reference documents used for retrieval

use serde::{Deserialize, Serialize};

/// A piece of a knowledge base document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub id: String,
    /// Where the chunk came from (file path or caller-supplied name)
    pub source: String,
    pub content: String,
}

impl KnowledgeChunk {
    /// Create a chunk with a generated ID
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            content: content.into(),
        }
    }
}

/// A chunk returned from similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: KnowledgeChunk,
    /// Similarity score (higher is closer)
    pub score: f32,
}
