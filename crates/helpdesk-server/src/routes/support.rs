//! Support Routes - Email summaries, ticket triage, CRM entries, routing
//!
//! Tools degrade instead of failing, so these handlers only reject
//! malformed bodies.

use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;

use crate::models::{
    CrmEntryInput, CrmEntryResponse, EmailInput, QueryInput, SummaryResponse, TicketInput,
};
use crate::AppState;

/// Summarize an email
#[utoipa::path(
    post,
    path = "/summarize-email",
    request_body = EmailInput,
    responses(
        (status = 200, description = "Email summary", body = SummaryResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Support"
)]
pub async fn summarize_email(
    State(state): State<AppState>,
    Json(payload): Json<EmailInput>,
) -> Json<SummaryResponse> {
    let summary = state.agent.summarize_email(&payload).await;
    Json(SummaryResponse { summary })
}

/// Categorize and prioritize a support ticket
#[utoipa::path(
    post,
    path = "/categorize-ticket",
    request_body = TicketInput,
    responses(
        (status = 200, description = "Category, priority, department and handling notes"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Support"
)]
pub async fn categorize_ticket(
    State(state): State<AppState>,
    Json(payload): Json<TicketInput>,
) -> Json<Value> {
    Json(state.agent.categorize_ticket(&payload).await)
}

/// Generate a CRM entry from an interaction
#[utoipa::path(
    post,
    path = "/create-crm-entry",
    request_body = CrmEntryInput,
    responses(
        (status = 200, description = "Structured CRM entry", body = CrmEntryResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Support"
)]
pub async fn create_crm_entry(
    State(state): State<AppState>,
    Json(payload): Json<CrmEntryInput>,
) -> Json<CrmEntryResponse> {
    let crm_entry = state.agent.create_crm_entry(&payload).await;
    Json(CrmEntryResponse { crm_entry })
}

/// Route a customer query to a department
#[utoipa::path(
    post,
    path = "/route-query",
    request_body = QueryInput,
    responses(
        (status = 200, description = "Department, priority, intent and next steps"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Support"
)]
pub async fn route_query(
    State(state): State<AppState>,
    Json(payload): Json<QueryInput>,
) -> Json<Value> {
    Json(state.agent.route_query(&payload).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summarize-email", post(summarize_email))
        .route("/categorize-ticket", post(categorize_ticket))
        .route("/create-crm-entry", post(create_crm_entry))
        .route("/route-query", post(route_query))
}
