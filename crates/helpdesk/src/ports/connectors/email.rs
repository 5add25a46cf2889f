//! Email Connector Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Email, EmailProvider, OutgoingEmail};

/// Mailbox access
#[async_trait]
pub trait EmailConnector: Send + Sync {
    /// Fetch emails that have not been processed yet
    async fn fetch_unprocessed(&self, limit: usize) -> Result<Vec<Email>, DomainError>;

    /// Mark an email as processed. Returns false for unknown IDs.
    async fn mark_processed(&self, email_id: &str) -> Result<bool, DomainError>;

    /// Send a new email
    async fn send(&self, email: OutgoingEmail) -> Result<bool, DomainError>;

    /// Reply to an existing email. Returns false for unknown IDs.
    async fn reply(
        &self,
        email_id: &str,
        body: &str,
        include_original: bool,
    ) -> Result<bool, DomainError>;

    fn provider(&self) -> &EmailProvider;
}
