//! Simulated mailbox

use async_trait::async_trait;
use chrono::{Duration, Utc};
use helpdesk::{DomainError, Email, EmailConnector, EmailProvider, OutgoingEmail};
use tokio::sync::RwLock;

struct StoredEmail {
    email: Email,
    processed: bool,
}

/// In-memory mailbox seeded with five customer emails
pub struct SimulatedMailbox {
    provider: EmailProvider,
    inbox: RwLock<Vec<StoredEmail>>,
    outbox: RwLock<Vec<OutgoingEmail>>,
}

impl SimulatedMailbox {
    pub fn new(provider: EmailProvider) -> Self {
        if provider.is_supported() {
            tracing::info!("📬 Email service initialized with type: {}", provider);
        } else {
            tracing::warn!(
                "⚠️  Unsupported email service type: {}. Using simulated mailbox.",
                provider
            );
        }

        let inbox = seed_emails()
            .into_iter()
            .map(|email| StoredEmail {
                email,
                processed: false,
            })
            .collect();

        Self {
            provider,
            inbox: RwLock::new(inbox),
            outbox: RwLock::new(Vec::new()),
        }
    }

    /// Emails sent or replied so far
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl EmailConnector for SimulatedMailbox {
    async fn fetch_unprocessed(&self, limit: usize) -> Result<Vec<Email>, DomainError> {
        let inbox = self.inbox.read().await;
        let emails: Vec<Email> = inbox
            .iter()
            .filter(|stored| !stored.processed)
            .take(limit)
            .map(|stored| stored.email.clone())
            .collect();

        tracing::info!("Retrieved {} unprocessed emails", emails.len());
        Ok(emails)
    }

    async fn mark_processed(&self, email_id: &str) -> Result<bool, DomainError> {
        let mut inbox = self.inbox.write().await;
        match inbox.iter_mut().find(|stored| stored.email.id == email_id) {
            Some(stored) => {
                stored.processed = true;
                tracing::info!("Marked email {} as processed", email_id);
                Ok(true)
            }
            None => {
                tracing::warn!("Email {} not found", email_id);
                Ok(false)
            }
        }
    }

    async fn send(&self, email: OutgoingEmail) -> Result<bool, DomainError> {
        tracing::info!("Sent email to {} with subject: {}", email.to, email.subject);
        self.outbox.write().await.push(email);
        Ok(true)
    }

    async fn reply(
        &self,
        email_id: &str,
        body: &str,
        include_original: bool,
    ) -> Result<bool, DomainError> {
        let original = {
            let inbox = self.inbox.read().await;
            inbox
                .iter()
                .find(|stored| stored.email.id == email_id)
                .map(|stored| stored.email.clone())
        };
        let Some(original) = original else {
            tracing::warn!("Cannot reply, email {} not found", email_id);
            return Ok(false);
        };

        let body = if include_original {
            format!(
                "{}\n\nOn {}, {} wrote:\n{}",
                body,
                original.date,
                original.sender,
                quote(&original.body)
            )
        } else {
            body.to_string()
        };

        let reply = OutgoingEmail::new(original.sender, format!("Re: {}", original.subject), body);
        self.outbox.write().await.push(reply);

        tracing::info!("Replied to email {}", email_id);
        Ok(true)
    }

    fn provider(&self) -> &EmailProvider {
        &self.provider
    }
}

fn quote(body: &str) -> String {
    body.lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn seed_emails() -> Vec<Email> {
    let now = Utc::now();
    let stamp = now.format("%Y%m%d%H%M%S");
    let samples: [(&str, &str, &str, &[&str], Option<&str>); 5] = [
        (
            "Issue with login to the platform",
            "Hello Support Team,\n\nI've been trying to log in to my account for the past two days but keep getting an 'Invalid credentials' error even though I'm sure my password is correct. I've tried resetting my password twice but still can't get in.\n\nCan you please help me resolve this issue? My account is associated with this email address.\n\nThank you,\nJohn Smith",
            "john.smith@example.com",
            &[],
            Some("CUST12345"),
        ),
        (
            "Question about my recent invoice",
            "Hi there,\n\nI received an invoice yesterday (Invoice #INV-2023-10-15) and noticed a charge for 'Premium Support' that I don't remember signing up for. Can you explain what this is and why I'm being charged for it?\n\nAlso, when is the payment due?\n\nRegards,\nSarah Johnson",
            "sarah.johnson@example.com",
            &["invoice.pdf"],
            Some("CUST67890"),
        ),
        (
            "Suggestion for new feature",
            "Hello Product Team,\n\nI've been using your software for about 6 months now and love it! I have a suggestion that I think would make it even better.\n\nIt would be really helpful if you could add a bulk export feature for reports. Currently, I have to export each report individually which is time-consuming when I need to analyze multiple reports together.\n\nIs this something you might consider adding in a future update?\n\nThanks,\nMichael Chen",
            "michael.chen@example.com",
            &[],
            Some("CUST24680"),
        ),
        (
            "Question about product compatibility",
            "Hello,\n\nI'm considering purchasing your software but need to know if it's compatible with Mac OS Monterey. Your website only mentions compatibility up to Big Sur.\n\nAlso, do you offer any educational discounts? I'm a teacher at Springfield High School.\n\nThanks for your help,\nEmily Rodriguez",
            "emily.rodriguez@example.com",
            &[],
            None,
        ),
        (
            "Following up on our conversation",
            "Hi Sales Team,\n\nThank you for the demo last week. I was impressed with the features you showed us, particularly the reporting capabilities.\n\nOur team has a few follow-up questions:\n1. Can we customize the dashboard for different user roles?\n2. What's the typical implementation timeline?\n3. Do you offer any training sessions for new users?\n\nWe're hoping to make a decision by the end of the month, so any information you can provide would be helpful.\n\nBest regards,\nDavid Wilson\nDirector of Operations\nAcme Corporation",
            "david.wilson@acmecorp.com",
            &["requirements.docx"],
            Some("CUST13579"),
        ),
    ];

    samples
        .iter()
        .enumerate()
        .map(|(i, (subject, body, sender, attachments, customer_id))| Email {
            id: format!("email_{}_{}", i, stamp),
            subject: subject.to_string(),
            body: body.to_string(),
            sender: sender.to_string(),
            date: (now - Duration::hours(i as i64)).to_rfc3339(),
            attachments: attachments.iter().map(|a| a.to_string()).collect(),
            customer_id: customer_id.map(str::to_string),
        })
        .collect()
}
