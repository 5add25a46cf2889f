//! Helpdesk API Server
//!
//! LLM customer service agent over HTTP: email summaries, ticket triage,
//! CRM entries, query routing, chat with function calling, email batch
//! processing and a retrieval knowledge base.

use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod adapters;
pub mod application;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod tools;

use application::{BatchRunner, CustomerServiceAgent};
use models::{HealthResponse, MessageResponse};

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<CustomerServiceAgent>,
    pub batch: Arc<BatchRunner>,
    pub llm_model: String,
    /// Bearer token required on protected routes; `None` disables auth
    pub api_key: Option<String>,
    /// Log every request through `TraceLayer`
    pub debug: bool,
}

/// Root endpoint
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "API is running", body = MessageResponse)),
    tag = "Health"
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "LLM Customer Service Agent API is running",
    ))
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Helpdesk API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm_model: state.llm_model.clone(),
        rag_enabled: state.agent.knowledge().is_available(),
    })
}

/// Build the full router: public, protected and documentation routes
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::support::router())
        .merge(routes::agent::router())
        .merge(routes::knowledge::router())
        .merge(routes::memory::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    let debug = state.debug;
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    if debug {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
