//! Simulated ticket desk

use async_trait::async_trait;
use chrono::{Duration, Utc};
use helpdesk::{
    DomainError, Ticket, TicketComment, TicketConnector, TicketDraft, TicketFilter,
    TicketProvider, TicketStatus,
};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{generate_id, merge_fields};

/// Fields callers may change through `update_ticket`
const UPDATABLE_FIELDS: [&str; 7] = [
    "title",
    "description",
    "status",
    "priority",
    "category",
    "assignee",
    "tags",
];

/// In-memory ticket desk seeded with five tickets
pub struct SimulatedTicketDesk {
    provider: TicketProvider,
    tickets: RwLock<Vec<Ticket>>,
}

impl SimulatedTicketDesk {
    pub fn new(provider: TicketProvider) -> Self {
        if provider.is_supported() {
            tracing::info!("🎫 Ticket service initialized with type: {}", provider);
        } else {
            tracing::warn!(
                "⚠️  Unsupported ticket service type: {}. Using simulated ticket desk.",
                provider
            );
        }

        Self {
            provider,
            tickets: RwLock::new(seed_tickets()),
        }
    }
}

#[async_trait]
impl TicketConnector for SimulatedTicketDesk {
    async fn create_ticket(&self, draft: TicketDraft) -> Result<String, DomainError> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::Validation(
                "Ticket title must not be empty".to_string(),
            ));
        }

        let ticket_id = generate_id("TICKET");
        let ticket = Ticket::open(ticket_id.clone(), draft);
        self.tickets.write().await.push(ticket);

        tracing::info!("Created ticket: {}", ticket_id);
        Ok(ticket_id)
    }

    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<Ticket>, DomainError> {
        let tickets = self.tickets.read().await;
        Ok(tickets.iter().find(|t| t.id == ticket_id).cloned())
    }

    async fn update_ticket(
        &self,
        ticket_id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, DomainError> {
        let mut tickets = self.tickets.write().await;
        let Some(ticket) = tickets.iter_mut().find(|t| t.id == ticket_id) else {
            tracing::warn!("Ticket {} not found", ticket_id);
            return Ok(false);
        };

        let mut allowed: Map<String, Value> = fields
            .into_iter()
            .filter(|(key, _)| UPDATABLE_FIELDS.contains(&key.as_str()))
            .collect();

        // Accept any casing for the status name
        if let Some(Value::String(status)) = allowed.get("status") {
            let status: TicketStatus = status.parse().map_err(DomainError::Validation)?;
            allowed.insert("status".to_string(), Value::String(status.to_string()));
        }

        let mut updated = merge_fields(ticket, &allowed)?;
        updated.updated_at = Utc::now();
        *ticket = updated;

        tracing::info!("Updated ticket {}", ticket_id);
        Ok(true)
    }

    async fn add_comment(
        &self,
        ticket_id: &str,
        body: &str,
        internal: bool,
    ) -> Result<bool, DomainError> {
        let mut tickets = self.tickets.write().await;
        let Some(ticket) = tickets.iter_mut().find(|t| t.id == ticket_id) else {
            tracing::warn!("Ticket {} not found", ticket_id);
            return Ok(false);
        };

        let now = Utc::now();
        ticket.comments.push(TicketComment {
            body: body.to_string(),
            internal,
            created_at: now,
        });
        ticket.updated_at = now;

        let comment_type = if internal {
            "internal note"
        } else {
            "public comment"
        };
        tracing::info!("Added {} to ticket {}", comment_type, ticket_id);
        Ok(true)
    }

    async fn tickets_for_customer(
        &self,
        customer_id: &str,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, DomainError> {
        let tickets = self.tickets.read().await;
        let results: Vec<Ticket> = tickets
            .iter()
            .filter(|t| t.customer_id.as_deref() == Some(customer_id))
            .filter(|t| status.map_or(true, |s| s == t.status))
            .cloned()
            .collect();

        tracing::info!(
            "Retrieved {} tickets for customer {}",
            results.len(),
            customer_id
        );
        Ok(results)
    }

    async fn search_tickets(
        &self,
        query: &str,
        filter: TicketFilter,
    ) -> Result<Vec<Ticket>, DomainError> {
        let query = query.to_lowercase();
        let tickets = self.tickets.read().await;
        let results: Vec<Ticket> = tickets
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&query)
                    || t.description.to_lowercase().contains(&query)
            })
            .filter(|t| filter.matches(t))
            .take(filter.limit)
            .cloned()
            .collect();

        tracing::info!(
            "Found {} tickets matching query: {}",
            results.len(),
            query
        );
        Ok(results)
    }

    fn provider(&self) -> &TicketProvider {
        &self.provider
    }
}

fn seed_tickets() -> Vec<Ticket> {
    let now = Utc::now();
    let samples = [
        (
            "Cannot login to dashboard",
            "Customer is unable to login to the dashboard after password reset.",
            TicketStatus::Open,
            "Technical",
            "High",
            "CUST12345",
        ),
        (
            "Billing discrepancy on invoice #12345",
            "Customer reports being charged for features they didn't use.",
            TicketStatus::Open,
            "Billing",
            "Medium",
            "CUST67890",
        ),
        (
            "Request for bulk export feature",
            "Customer would like the ability to export all reports at once.",
            TicketStatus::Pending,
            "Feature Request",
            "Low",
            "CUST24680",
        ),
        (
            "Error message when uploading files",
            "Customer was seeing an error when uploading CSV files. Issue resolved.",
            TicketStatus::Closed,
            "Technical",
            "Medium",
            "CUST12345",
        ),
        (
            "Question about API rate limits",
            "Customer wants to know what the API rate limits are for their plan.",
            TicketStatus::Open,
            "Technical",
            "Low",
            "CUST13579",
        ),
    ];

    samples
        .iter()
        .enumerate()
        .map(
            |(i, (title, description, status, category, priority, customer_id))| Ticket {
                id: format!("TICKET_{}_{}", i, now.format("%Y%m%d")),
                title: title.to_string(),
                description: description.to_string(),
                status: *status,
                priority: priority.to_string(),
                category: category.to_string(),
                customer_id: Some(customer_id.to_string()),
                created_at: now - Duration::days(i as i64),
                updated_at: now,
                assignee: None,
                tags: Vec::new(),
                comments: Vec::new(),
            },
        )
        .collect()
}
