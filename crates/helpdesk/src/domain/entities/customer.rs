//! Customer - CRM records and interaction history
//!
//! Pure domain entities without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer record in the CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: String,
    /// Lifecycle status (Active, Prospect, ...)
    #[serde(default = "default_status")]
    pub status: String,
    /// Subscription plan, absent for prospects
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_contact: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_status() -> String {
    "Active".to_string()
}

/// A past interaction with a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    /// Channel of the interaction (Email, Call, Support Ticket, ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: String,
    pub description: String,
    pub date: DateTime<Utc>,
    /// Staff member who handled it
    pub agent: String,
}

/// A stored CRM entry (interaction log, note, activity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmRecord {
    pub id: String,
    /// Structured entry as produced by the CRM entry generator
    pub entry: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl CrmRecord {
    pub fn new(id: String, entry: serde_json::Value) -> Self {
        Self {
            id,
            entry,
            created_at: Utc::now(),
        }
    }
}
