//! Email - Messages received from and sent to customers

use serde::{Deserialize, Serialize};

/// An email fetched from the mailbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    /// Provider-specific message identifier
    pub id: String,
    pub subject: String,
    pub body: String,
    /// Sender name or address
    pub sender: String,
    /// Send date as reported by the provider (RFC 3339)
    pub date: String,
    /// Attachment file names
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Customer this email was matched to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// An email to be sent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    /// HTML or plain text body
    pub body: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }
}
