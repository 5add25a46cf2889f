//! CRM Connector Port

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{errors::DomainError, CrmProvider, Customer, Interaction};

/// CRM system access
#[async_trait]
pub trait CrmConnector: Send + Sync {
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, DomainError>;

    /// Search customers by name, email or company
    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, DomainError>;

    /// Store a CRM entry and return its ID
    async fn create_entry(&self, entry: Value) -> Result<String, DomainError>;

    /// Merge fields into a customer record. Returns false for unknown IDs.
    async fn update_customer(
        &self,
        customer_id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, DomainError>;

    /// Create a customer and return its ID
    async fn create_customer(&self, fields: Map<String, Value>) -> Result<String, DomainError>;

    /// Most recent interactions with a customer
    async fn recent_interactions(
        &self,
        customer_id: &str,
        limit: usize,
    ) -> Result<Vec<Interaction>, DomainError>;

    fn provider(&self) -> &CrmProvider;
}
