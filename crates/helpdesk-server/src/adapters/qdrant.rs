//! Qdrant Knowledge Store - Knowledge base chunks in a Qdrant collection

use std::collections::HashMap;

use async_trait::async_trait;
use helpdesk::{DomainError, KnowledgeChunk, KnowledgeStore, ScoredChunk};
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;

/// Qdrant client wrapper bound to one collection
pub struct QdrantKnowledgeStore {
    client: Qdrant,
    collection: String,
}

fn repo_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Repository(e.to_string())
}

impl QdrantKnowledgeStore {
    /// Connect and make sure the collection exists
    pub async fn connect(
        url: &str,
        api_key: Option<String>,
        collection: &str,
        dimensions: u64,
    ) -> Result<Self, DomainError> {
        let client = if let Some(key) = api_key {
            Qdrant::from_url(url).api_key(key).build().map_err(repo_err)?
        } else {
            Qdrant::from_url(url).build().map_err(repo_err)?
        };

        let store = Self {
            client,
            collection: collection.to_string(),
        };
        store.ensure_collection(dimensions).await?;

        tracing::info!("🌊 Connected to Qdrant collection: {}", collection);

        Ok(store)
    }

    async fn ensure_collection(&self, dimensions: u64) -> Result<(), DomainError> {
        if self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(repo_err)?
        {
            tracing::info!("Collection {} already exists", self.collection);
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimensions, Distance::Cosine)),
            )
            .await
            .map_err(repo_err)?;

        tracing::info!("✨ Created collection: {}", self.collection);

        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for QdrantKnowledgeStore {
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
        if chunks.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            let payload: HashMap<String, serde_json::Value> =
                serde_json::from_value(serde_json::to_value(&chunk)?)?;
            points.push(PointStruct::new(chunk.id.clone(), vector, payload));
        }
        let count = points.len();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(repo_err)?;

        tracing::info!("💾 Stored {} chunks in {}", count, self.collection);

        Ok(())
    }

    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query_vector, limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(repo_err)?;

        let chunks: Vec<ScoredChunk> = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let payload_json = serde_json::to_value(&point.payload).ok()?;
                let chunk: KnowledgeChunk = serde_json::from_value(payload_json).ok()?;
                Some(ScoredChunk {
                    chunk,
                    score: point.score,
                })
            })
            .collect();

        tracing::debug!("🔍 Found {} chunks in {}", chunks.len(), self.collection);

        Ok(chunks)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(repo_err)?;

        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }
}
