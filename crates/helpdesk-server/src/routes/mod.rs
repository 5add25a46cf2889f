//! Helpdesk API Routes
//!
//! - /summarize-email, /categorize-ticket, /create-crm-entry, /route-query
//! - /chat - Agent conversation with function calling
//! - /process-email-batch - Mailbox processing
//! - /knowledge - Retrieval and ingestion
//! - /customers/:id/context, /memory - Agent memory

pub mod agent;
pub mod knowledge;
pub mod memory;
pub mod support;
pub mod swagger;

use axum::http::StatusCode;
use helpdesk::DomainError;

/// Map a domain error to a status code; 500s get the operation prefix
pub(crate) fn error_response(operation: &str, e: DomainError) -> (StatusCode, String) {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::ExternalService(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => {
            tracing::error!("{}: {}", operation, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{}: {}", operation, e),
            );
        }
    };
    (status, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_mapping() {
        let (status, body) = error_response(
            "Error routing query",
            DomainError::Llm("timeout".to_string()),
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error routing query: LLM error: timeout");

        let (status, _) = error_response("x", DomainError::not_found("Customer", "CUST1"));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = error_response("x", DomainError::Conflict("busy".to_string()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, "Conflict: busy");

        let (status, _) = error_response("x", DomainError::ExternalService("down".to_string()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = error_response("x", DomainError::Validation("bad".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
