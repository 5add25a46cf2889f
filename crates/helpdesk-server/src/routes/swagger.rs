//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Knowledge models
    AddDocumentsRequest,
    AddDocumentsResponse,
    // Agent models
    BatchFailure,
    BatchReport,
    BatchStatus,
    ChatReply,
    ChatRequest,
    // Support models
    CrmEntryInput,
    CrmEntryResponse,
    EmailInput,
    HealthResponse,
    // Memory models
    HistoryMessage,
    KnowledgeAnswer,
    KnowledgeQueryRequest,
    MessageResponse,
    QueryInput,
    SummaryResponse,
    TicketInput,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::root,
        crate::health_check,
        // Support endpoints
        super::support::summarize_email,
        super::support::categorize_ticket,
        super::support::create_crm_entry,
        super::support::route_query,
        // Agent endpoints
        super::agent::chat,
        super::agent::process_email_batch,
        super::agent::batch_status,
        // Knowledge endpoints
        super::knowledge::query_knowledge,
        super::knowledge::add_documents,
        // Memory endpoints
        super::memory::get_customer_context,
        super::memory::update_customer_context,
        super::memory::get_history,
        super::memory::clear_memory,
    ),
    components(schemas(
        MessageResponse,
        HealthResponse,
        EmailInput,
        SummaryResponse,
        TicketInput,
        CrmEntryInput,
        CrmEntryResponse,
        QueryInput,
        ChatRequest,
        ChatReply,
        BatchFailure,
        BatchReport,
        BatchStatus,
        KnowledgeQueryRequest,
        KnowledgeAnswer,
        AddDocumentsRequest,
        AddDocumentsResponse,
        HistoryMessage,
    )),
    tags(
        (name = "Health", description = "Liveness and version"),
        (name = "Support", description = "Email summaries, ticket triage, CRM entries, query routing"),
        (name = "Agent", description = "Chat and email batch processing"),
        (name = "Knowledge", description = "Retrieval-augmented knowledge base"),
        (name = "Memory", description = "Customer context and conversation history"),
    ),
    info(
        title = "Helpdesk API",
        version = "0.2.0",
        description = "LLM customer service agent: summaries, triage, CRM entries, routing and chat"
    )
)]
pub struct ApiDoc;
