//! Local Knowledge Store - File-backed vector store
//!
//! Chunks and vectors live in memory and are written to
//! `<dir>/<collection>.json` after every change. Search is a linear
//! cosine-similarity scan.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use helpdesk::{DomainError, KnowledgeChunk, KnowledgeStore, ScoredChunk};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChunk {
    chunk: KnowledgeChunk,
    vector: Vec<f32>,
}

pub struct LocalKnowledgeStore {
    file: PathBuf,
    entries: RwLock<Vec<StoredChunk>>,
}

impl LocalKnowledgeStore {
    /// Open (or create) the store for a collection under `dir`
    pub async fn open(dir: &Path, collection: &str) -> Result<Self, DomainError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DomainError::Repository(format!("{}: {}", dir.display(), e)))?;

        let file = dir.join(format!("{}.json", collection));
        let entries = match tokio::fs::read_to_string(&file).await {
            Ok(raw) => serde_json::from_str::<Vec<StoredChunk>>(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(DomainError::Repository(format!(
                    "{}: {}",
                    file.display(),
                    e
                )))
            }
        };

        tracing::info!(
            "📚 Local knowledge store opened: {} ({} chunks)",
            file.display(),
            entries.len()
        );

        Ok(Self {
            file,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &[StoredChunk]) -> Result<(), DomainError> {
        let raw = serde_json::to_string(entries)?;
        tokio::fs::write(&self.file, raw)
            .await
            .map_err(|e| DomainError::Repository(format!("{}: {}", self.file.display(), e)))
    }
}

#[async_trait]
impl KnowledgeStore for LocalKnowledgeStore {
    async fn add(
        &self,
        chunks: Vec<KnowledgeChunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<(), DomainError> {
        if chunks.len() != vectors.len() {
            return Err(DomainError::Validation(format!(
                "{} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let mut entries = self.entries.write().await;
        let kept = entries.len();
        entries.extend(
            chunks
                .into_iter()
                .zip(vectors)
                .map(|(chunk, vector)| StoredChunk { chunk, vector }),
        );

        // Only chunks that reached the file become searchable
        if let Err(e) = self.persist(&entries).await {
            entries.truncate(kept);
            return Err(e);
        }
        Ok(())
    }

    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        let entries = self.entries.read().await;
        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&query_vector, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }
}

/// Cosine similarity, 0.0 for mismatched or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
