//! Knowledge Routes - Retrieval and ingestion

use std::path::Path;

use axum::{extract::State, routing::post, Json, Router};
use helpdesk::DomainError;

use super::error_response;
use crate::models::{
    AddDocumentsRequest, AddDocumentsResponse, KnowledgeAnswer, KnowledgeQueryRequest,
};
use crate::tools::RagQueryInput;
use crate::AppState;

/// Answer a question from the knowledge base
#[utoipa::path(
    post,
    path = "/knowledge/query",
    request_body = KnowledgeQueryRequest,
    responses(
        (status = 200, description = "Answer, or a message explaining why none was produced", body = KnowledgeAnswer),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Knowledge"
)]
pub async fn query_knowledge(
    State(state): State<AppState>,
    Json(payload): Json<KnowledgeQueryRequest>,
) -> Json<KnowledgeAnswer> {
    let mut input = RagQueryInput::new(payload.query);
    if let Some(max_results) = payload.max_results {
        input.max_results = max_results;
    }

    let answer = state.agent.knowledge().retrieve(&input).await;
    Json(KnowledgeAnswer { answer })
}

/// Add documents to the knowledge base
#[utoipa::path(
    post,
    path = "/knowledge/documents",
    request_body = AddDocumentsRequest,
    responses(
        (status = 200, description = "Chunks added", body = AddDocumentsResponse),
        (status = 400, description = "Neither a path nor source and text were given"),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Knowledge base unavailable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Knowledge"
)]
pub async fn add_documents(
    State(state): State<AppState>,
    Json(payload): Json<AddDocumentsRequest>,
) -> Result<Json<AddDocumentsResponse>, (axum::http::StatusCode, String)> {
    let knowledge = state.agent.knowledge();

    let result = match payload {
        AddDocumentsRequest {
            path: Some(path), ..
        } => knowledge.add_documents(Path::new(&path)).await,
        AddDocumentsRequest {
            source: Some(source),
            text: Some(text),
            ..
        } => knowledge.add_text(&source, &text).await,
        _ => Err(DomainError::Validation(
            "Provide either `path` or both `source` and `text`".to_string(),
        )),
    };

    let chunks_added = result.map_err(|e| error_response("Error adding documents", e))?;
    Ok(Json(AddDocumentsResponse { chunks_added }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/knowledge/query", post(query_knowledge))
        .route("/knowledge/documents", post(add_documents))
}
