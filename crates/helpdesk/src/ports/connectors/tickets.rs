//! Ticketing Connector Port

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{
    errors::DomainError, Ticket, TicketDraft, TicketFilter, TicketProvider, TicketStatus,
};

/// Ticketing system access
#[async_trait]
pub trait TicketConnector: Send + Sync {
    /// Open a ticket and return its ID
    async fn create_ticket(&self, draft: TicketDraft) -> Result<String, DomainError>;

    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<Ticket>, DomainError>;

    /// Merge fields into a ticket. Returns false for unknown IDs.
    async fn update_ticket(
        &self,
        ticket_id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, DomainError>;

    /// Append a comment. Returns false for unknown IDs.
    async fn add_comment(
        &self,
        ticket_id: &str,
        body: &str,
        internal: bool,
    ) -> Result<bool, DomainError>;

    async fn tickets_for_customer(
        &self,
        customer_id: &str,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, DomainError>;

    /// Search title and description, then apply filters
    async fn search_tickets(
        &self,
        query: &str,
        filter: TicketFilter,
    ) -> Result<Vec<Ticket>, DomainError>;

    fn provider(&self) -> &TicketProvider;
}
