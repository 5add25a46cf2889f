//! Ticket - Support tickets tracked in the ticketing system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::TicketStatus;

/// Support ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TicketStatus,
    pub priority: String,
    pub category: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<TicketComment>,
}

/// Data required to open a ticket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

impl Ticket {
    /// Open a new ticket from a draft
    pub fn open(id: String, draft: TicketDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: TicketStatus::Open,
            priority: draft.priority,
            category: draft.category,
            customer_id: draft.customer_id,
            created_at: now,
            updated_at: now,
            assignee: None,
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }
}

/// Comment on a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketComment {
    pub body: String,
    /// Internal notes are not visible to the customer
    pub internal: bool,
    pub created_at: DateTime<Utc>,
}

/// Filters for ticket search
#[derive(Debug, Clone)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub category: Option<String>,
    pub priority: Option<String>,
    /// Maximum number of results
    pub limit: usize,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self {
            status: None,
            category: None,
            priority: None,
            limit: 10,
        }
    }
}

impl TicketFilter {
    /// Check the optional filters against a ticket (case-insensitive)
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = &self.status {
            if *status != ticket.status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !category.eq_ignore_ascii_case(&ticket.category) {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if !priority.eq_ignore_ascii_case(&ticket.priority) {
                return false;
            }
        }
        true
    }
}
