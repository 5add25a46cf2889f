//! Email Summarizer - Key points and action items from an email

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk::{DomainError, LlmProvider};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::{ask, invalid_args, Tool};

const TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = "You are an expert email summarizer for a busy professional.
Your task is to extract the most important information from emails and present it in a clear, concise format.

For each email, provide:
1. A one-sentence TLDR summary
2. Key points (2-4 bullet points)
3. Any action items or requests (if present)
4. Any deadlines or important dates (if present)

Be concise but comprehensive. Focus on extracting actionable information and the core message.
Ignore pleasantries and standard email formalities unless they contain important context.
";

/// Email to summarize
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailInput {
    /// The email subject line
    pub subject: String,
    /// The full email body text
    pub body: String,
    /// The email sender's name or address
    pub sender: String,
    /// The date and time when the email was sent
    pub date: String,
    /// Attachment file names, if any
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
}

pub struct EmailSummarizer {
    llm: Arc<dyn LlmProvider>,
}

impl EmailSummarizer {
    pub const NAME: &'static str = "email_summarizer";
    pub const DESCRIPTION: &'static str = "Summarizes emails into key points and action items";

    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Summarize an email. LLM failures come back as a failure message.
    pub async fn summarize(&self, email: &EmailInput) -> String {
        let attachments = match email.attachments.as_deref() {
            Some(list) if !list.is_empty() => list.join(", "),
            _ => "None".to_string(),
        };

        let prompt = format!(
            "Please summarize the following email:\n\n\
             Subject: {}\n\
             From: {}\n\
             Date: {}\n\
             Attachments: {}\n\n\
             Email Body:\n{}\n",
            email.subject, email.sender, email.date, attachments, email.body
        );

        match ask(self.llm.as_ref(), SYSTEM_PROMPT, prompt, TEMPERATURE).await {
            Ok(summary) => {
                tracing::info!("Successfully summarized email from {}", email.sender);
                summary
            }
            Err(e) => {
                let error_msg = format!("Error summarizing email: {}", e);
                tracing::error!("{}", error_msg);
                format!("Failed to summarize email: {}", error_msg)
            }
        }
    }
}

#[async_trait]
impl Tool for EmailSummarizer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": {"type": "string", "description": "The email subject line"},
                "body": {"type": "string", "description": "The full email body text"},
                "sender": {"type": "string", "description": "The email sender's name or address"},
                "date": {"type": "string", "description": "The date and time when the email was sent"},
                "attachments": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "List of attachment filenames, if any"
                }
            },
            "required": ["subject", "body", "sender", "date"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, DomainError> {
        let input: EmailInput =
            serde_json::from_value(args).map_err(|e| invalid_args(Self::NAME, e))?;
        Ok(Value::String(self.summarize(&input).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::ScriptedLlm;

    fn email(attachments: Option<Vec<String>>) -> EmailInput {
        EmailInput {
            subject: "Question about my recent invoice".to_string(),
            body: "Why was I charged for Premium Support?".to_string(),
            sender: "sarah.johnson@example.com".to_string(),
            date: "2023-10-15T09:00:00".to_string(),
            attachments,
        }
    }

    #[tokio::test]
    async fn test_summary_prompt_lists_attachments() {
        let llm = Arc::new(ScriptedLlm::text("TLDR: billing question"));
        let summarizer = EmailSummarizer::new(llm.clone());

        let summary = summarizer
            .summarize(&email(Some(vec!["invoice.pdf".into(), "terms.pdf".into()])))
            .await;

        assert_eq!(summary, "TLDR: billing question");
        let prompt = llm.last_prompt();
        assert!(prompt.contains("Subject: Question about my recent invoice"));
        assert!(prompt.contains("From: sarah.johnson@example.com"));
        assert!(prompt.contains("Attachments: invoice.pdf, terms.pdf"));
        assert!(prompt.contains("Email Body:\nWhy was I charged"));
        assert_eq!(llm.last_temperature(), Some(0.1));
    }

    #[tokio::test]
    async fn test_no_attachments_renders_none() {
        let llm = Arc::new(ScriptedLlm::text("ok"));
        let summarizer = EmailSummarizer::new(llm.clone());
        summarizer.summarize(&email(Some(Vec::new()))).await;
        assert!(llm.last_prompt().contains("Attachments: None"));
    }

    #[tokio::test]
    async fn test_llm_failure_degrades() {
        let summarizer = EmailSummarizer::new(Arc::new(ScriptedLlm::failing("timeout")));
        let summary = summarizer.summarize(&email(None)).await;
        assert_eq!(
            summary,
            "Failed to summarize email: Error summarizing email: LLM error: timeout"
        );
    }

    #[tokio::test]
    async fn test_invoke_rejects_missing_fields() {
        let summarizer = EmailSummarizer::new(Arc::new(ScriptedLlm::text("ok")));
        let err = summarizer
            .invoke(json!({"subject": "hi"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
