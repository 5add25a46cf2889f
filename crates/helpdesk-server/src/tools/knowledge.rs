//! Knowledge Tool - Retrieval-augmented answers from the knowledge base

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use helpdesk::{
    DomainError, EmbeddingService, KnowledgeChunk, KnowledgeStore, LlmProvider, TextSplitter,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::{ask, invalid_args, Tool};
use crate::adapters::documents::{load_documents, Document};

const TEMPERATURE: f32 = 0.2;

const SYSTEM_PROMPT: &str = "You are a knowledgeable assistant that provides accurate information based on the retrieved context.
Your task is to answer the user's query using only the information provided in the context.

Guidelines:
1. If the context contains the information needed to answer the query, provide a comprehensive response.
2. If the context only partially addresses the query, provide what information you can and acknowledge the limitations.
3. If the context doesn't contain relevant information, honestly state that you don't have enough information to answer.
4. Do not make up information or use knowledge outside of the provided context.
5. Cite the specific parts of the context that your answer is based on.

Format your response in a clear, concise manner. Use bullet points or numbered lists when appropriate.
";

const DISABLED_MESSAGE: &str =
    "RAG functionality is currently disabled. Please enable it in the settings.";
const EMPTY_MESSAGE: &str =
    "The knowledge base is empty. Please add documents before using this tool.";
const NO_RESULTS_MESSAGE: &str = "No relevant information found in the knowledge base.";

fn default_max_results() -> usize {
    3
}

/// Knowledge base query
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RagQueryInput {
    /// The query to retrieve information for
    pub query: String,
    /// Additional context for the query
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub context: Option<Map<String, Value>>,
    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl RagQueryInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
            max_results: default_max_results(),
        }
    }
}

pub struct KnowledgeTool {
    llm: Arc<dyn LlmProvider>,
    embeddings: Arc<dyn EmbeddingService>,
    store: Option<Arc<dyn KnowledgeStore>>,
    enabled: bool,
    splitter: TextSplitter,
}

impl KnowledgeTool {
    pub const NAME: &'static str = "rag_tool";
    pub const DESCRIPTION: &'static str =
        "Retrieves relevant information from a knowledge base to answer questions";

    pub fn new(
        llm: Arc<dyn LlmProvider>,
        embeddings: Arc<dyn EmbeddingService>,
        store: Option<Arc<dyn KnowledgeStore>>,
        enabled: bool,
    ) -> Self {
        Self {
            llm,
            embeddings,
            store,
            enabled,
            splitter: TextSplitter::default(),
        }
    }

    /// Whether retrieval can actually run
    pub fn is_available(&self) -> bool {
        self.enabled && self.store.is_some()
    }

    /// Answer a query from retrieved chunks. Every outcome is a message.
    pub async fn retrieve(&self, input: &RagQueryInput) -> String {
        if !self.enabled {
            return DISABLED_MESSAGE.to_string();
        }

        match self.answer(input).await {
            Ok(answer) => answer,
            Err(e) => {
                let error_msg = format!("Error retrieving information: {}", e);
                tracing::error!("{}", error_msg);
                format!("Failed to retrieve information: {}", error_msg)
            }
        }
    }

    async fn answer(&self, input: &RagQueryInput) -> Result<String, DomainError> {
        let store = self.store()?;

        if store.count().await? == 0 {
            return Ok(EMPTY_MESSAGE.to_string());
        }

        let vector = self.embeddings.embed(&input.query).await?;
        let hits = store.search(vector, input.max_results.max(1)).await?;
        if hits.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let context = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| format!("Document {}:\n{}", i + 1, hit.chunk.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Query: {}\n\n\
             Context:\n{}\n\n\
             Please provide a response based solely on the above context.\n",
            input.query, context
        );

        let answer = ask(self.llm.as_ref(), SYSTEM_PROMPT, prompt, TEMPERATURE).await?;
        tracing::info!(
            "Successfully generated RAG response for query: {}...",
            input.query.chars().take(50).collect::<String>()
        );
        Ok(answer)
    }

    /// Ingest a file or a directory of text files; returns the chunk count
    pub async fn add_documents(&self, path: &Path) -> Result<usize, DomainError> {
        self.store()?;
        let documents = load_documents(path).await?;
        self.ingest(documents).await
    }

    /// Ingest inline text under a source name; returns the chunk count
    pub async fn add_text(&self, source: &str, text: &str) -> Result<usize, DomainError> {
        self.store()?;
        if text.trim().is_empty() {
            return Err(DomainError::Validation(
                "Document text must not be empty".to_string(),
            ));
        }
        self.ingest(vec![Document {
            source: source.to_string(),
            text: text.to_string(),
        }])
        .await
    }

    async fn ingest(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
        let store = self.store()?;

        let chunks: Vec<KnowledgeChunk> = documents
            .iter()
            .flat_map(|doc| {
                self.splitter
                    .split(&doc.text)
                    .into_iter()
                    .map(move |content| KnowledgeChunk::new(doc.source.clone(), content))
            })
            .collect();

        if chunks.is_empty() {
            tracing::warn!("⚠️  No content to add to the knowledge base");
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embeddings.embed_batch(&texts).await?;

        let added = chunks.len();
        store.add(chunks, vectors).await?;

        tracing::info!("📚 Added {} document chunks to the knowledge base", added);
        Ok(added)
    }

    fn store(&self) -> Result<&Arc<dyn KnowledgeStore>, DomainError> {
        if !self.enabled {
            return Err(DomainError::ExternalService(DISABLED_MESSAGE.to_string()));
        }
        self.store.as_ref().ok_or_else(|| {
            DomainError::ExternalService("Knowledge store is not available".to_string())
        })
    }
}

#[async_trait]
impl Tool for KnowledgeTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The query to retrieve information for"},
                "context": {"type": "object", "description": "Additional context for the query"},
                "max_results": {"type": "integer", "description": "Maximum number of results to return", "default": 3}
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, DomainError> {
        let input: RagQueryInput =
            serde_json::from_value(args).map_err(|e| invalid_args(Self::NAME, e))?;
        Ok(Value::String(self.retrieve(&input).await))
    }
}
