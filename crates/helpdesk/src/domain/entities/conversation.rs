//! Conversation - Messages remembered by the agent

use serde::{Deserialize, Serialize};

/// Who produced a remembered message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Human,
    Ai,
    System,
}

/// A single remembered message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    /// Customer the message relates to, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl ConversationMessage {
    pub fn human(content: impl Into<String>, customer_id: Option<String>) -> Self {
        Self {
            kind: MessageKind::Human,
            content: content.into(),
            customer_id,
        }
    }

    pub fn ai(content: impl Into<String>, customer_id: Option<String>) -> Self {
        Self {
            kind: MessageKind::Ai,
            content: content.into(),
            customer_id,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::System,
            content: content.into(),
            customer_id: None,
        }
    }
}

/// Free-form context remembered per customer
pub type CustomerContext = serde_json::Map<String, serde_json::Value>;
