//! Knowledge base DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Knowledge base query
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KnowledgeQueryRequest {
    pub query: String,
    /// Number of chunks to retrieve (default: 3)
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Knowledge base answer
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KnowledgeAnswer {
    pub answer: String,
}

/// Ingest a server-side path, or inline text under a source name
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AddDocumentsRequest {
    /// File or directory on the server
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Ingestion result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddDocumentsResponse {
    pub chunks_added: usize,
}
