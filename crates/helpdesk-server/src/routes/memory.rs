//! Memory Routes - Customer context and conversation history

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use helpdesk::CustomerContext;

use crate::application::memory::DEFAULT_HISTORY_LIMIT;
use crate::models::{HistoryMessage, HistoryQuery};
use crate::AppState;

/// Get the stored context for a customer
#[utoipa::path(
    get,
    path = "/customers/{id}/context",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer context (empty when nothing is stored)"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Memory"
)]
pub async fn get_customer_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CustomerContext> {
    Json(state.agent.memory().customer_context(&id).await)
}

/// Merge keys into the stored context for a customer
#[utoipa::path(
    put,
    path = "/customers/{id}/context",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Merged customer context"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Memory"
)]
pub async fn update_customer_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerContext>,
) -> Json<CustomerContext> {
    Json(
        state
            .agent
            .memory()
            .update_customer_context(&id, payload)
            .await,
    )
}

/// Conversation history, optionally for one customer
#[utoipa::path(
    get,
    path = "/memory/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Remembered messages, oldest first", body = Vec<HistoryMessage>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Memory"
)]
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<HistoryMessage>> {
    let memory = state.agent.memory();
    let messages = match (query.customer_id.as_deref(), query.limit) {
        (None, None) => memory.history().await,
        (customer_id, limit) => {
            memory
                .relevant_history(customer_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
                .await
        }
    };

    Json(messages.into_iter().map(HistoryMessage::from).collect())
}

/// Forget the conversation history (customer contexts are kept)
#[utoipa::path(
    delete,
    path = "/memory",
    responses(
        (status = 204, description = "History cleared"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Memory"
)]
pub async fn clear_memory(State(state): State<AppState>) -> StatusCode {
    state.agent.memory().clear().await;
    StatusCode::NO_CONTENT
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/customers/:id/context",
            get(get_customer_context).put(update_customer_context),
        )
        .route("/memory/history", get(get_history))
        .route("/memory", delete(clear_memory))
}
