//! Agent Routes - Chat and email batch processing

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use super::error_response;
use crate::models::{BatchStatus, ChatReply, ChatRequest, MessageResponse};
use crate::AppState;

/// Chat with the agent
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Agent answer and the tools it used", body = ChatReply),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Agent"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (axum::http::StatusCode, String)> {
    let reply = state
        .agent
        .chat(&payload.message, payload.customer_id.as_deref())
        .await
        .map_err(|e| error_response("Error in chat", e))?;

    Ok(Json(reply))
}

/// Start processing unprocessed emails in the background
#[utoipa::path(
    post,
    path = "/process-email-batch",
    responses(
        (status = 200, description = "Batch started", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A batch is already running"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Agent"
)]
pub async fn process_email_batch(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, (axum::http::StatusCode, String)> {
    state
        .batch
        .start()
        .map_err(|e| error_response("Error starting email batch process", e))?;

    tracing::info!("📬 Email batch processing started");
    Ok(Json(MessageResponse::new("Email batch processing started")))
}

/// Email batch status and the last report
#[utoipa::path(
    get,
    path = "/process-email-batch/status",
    responses(
        (status = 200, description = "Batch status", body = BatchStatus),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Agent"
)]
pub async fn batch_status(State(state): State<AppState>) -> Json<BatchStatus> {
    Json(state.batch.status().await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/process-email-batch", post(process_email_batch))
        .route("/process-email-batch/status", get(batch_status))
}
