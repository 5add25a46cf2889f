//! Memory DTOs

use helpdesk::{ConversationMessage, MessageKind};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// History query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Only this customer's messages
    pub customer_id: Option<String>,
    /// Maximum number of messages (default: all, or 10 with a customer)
    pub limit: Option<usize>,
}

/// A remembered conversation message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryMessage {
    /// human, ai or system
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl From<ConversationMessage> for HistoryMessage {
    fn from(message: ConversationMessage) -> Self {
        let kind = match message.kind {
            MessageKind::Human => "human",
            MessageKind::Ai => "ai",
            MessageKind::System => "system",
        };
        Self {
            kind: kind.to_string(),
            content: message.content,
            customer_id: message.customer_id,
        }
    }
}
