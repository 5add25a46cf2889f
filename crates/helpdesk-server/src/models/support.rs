//! Support operation DTOs
//!
//! Request bodies are the tool inputs themselves; see `crate::tools`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::tools::{CrmEntryInput, EmailInput, QueryInput, TicketInput};

/// Plain message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub llm_model: String,
    pub rag_enabled: bool,
}

/// Email summary response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Generated CRM entry response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CrmEntryResponse {
    /// Structured entry; carries an `error` field when generation degraded
    pub crm_entry: serde_json::Value,
}
