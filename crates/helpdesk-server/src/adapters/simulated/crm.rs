//! Simulated CRM

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use helpdesk::{CrmConnector, CrmProvider, CrmRecord, Customer, DomainError, Interaction};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{generate_id, merge_fields};

/// In-memory CRM seeded with four customers
pub struct SimulatedCrm {
    provider: CrmProvider,
    customers: RwLock<Vec<Customer>>,
    entries: RwLock<Vec<CrmRecord>>,
}

impl SimulatedCrm {
    pub fn new(provider: CrmProvider) -> Self {
        if provider.is_supported() {
            tracing::info!("📇 CRM service initialized with type: {}", provider);
        } else {
            tracing::warn!(
                "⚠️  Unsupported CRM service type: {}. Using simulated CRM.",
                provider
            );
        }

        Self {
            provider,
            customers: RwLock::new(seed_customers()),
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Entries created so far
    pub async fn entries(&self) -> Vec<CrmRecord> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl CrmConnector for SimulatedCrm {
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|c| c.id == customer_id).cloned())
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, DomainError> {
        let query = query.to_lowercase();
        let customers = self.customers.read().await;
        let results: Vec<Customer> = customers
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&query)
                    || c.email.to_lowercase().contains(&query)
                    || c.company.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();

        tracing::info!(
            "Found {} customers matching query: {}",
            results.len(),
            query
        );
        Ok(results)
    }

    async fn create_entry(&self, entry: Value) -> Result<String, DomainError> {
        let entry_id = generate_id("ENTRY");
        self.entries
            .write()
            .await
            .push(CrmRecord::new(entry_id.clone(), entry));

        tracing::info!("Created CRM entry: {}", entry_id);
        Ok(entry_id)
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, DomainError> {
        let mut customers = self.customers.write().await;
        let Some(customer) = customers.iter_mut().find(|c| c.id == customer_id) else {
            tracing::warn!("Customer {} not found", customer_id);
            return Ok(false);
        };

        *customer = merge_fields(customer, &fields)?;
        tracing::info!("Updated customer {}", customer_id);
        Ok(true)
    }

    async fn create_customer(&self, mut fields: Map<String, Value>) -> Result<String, DomainError> {
        let customer_id = generate_id("CUST");
        fields.insert("id".to_string(), Value::String(customer_id.clone()));
        let customer: Customer = serde_json::from_value(Value::Object(fields))
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        self.customers.write().await.push(customer);
        tracing::info!("Created customer: {}", customer_id);
        Ok(customer_id)
    }

    async fn recent_interactions(
        &self,
        customer_id: &str,
        limit: usize,
    ) -> Result<Vec<Interaction>, DomainError> {
        let now = Utc::now();
        let stamp = now.format("%Y%m%d%H%M%S");
        let samples = [
            (
                "Email",
                "Product inquiry",
                "Customer asked about product features and pricing",
                "Alex Johnson",
            ),
            (
                "Support Ticket",
                "Login issue",
                "Customer reported difficulty logging in. Issue resolved by resetting account.",
                "Maria Garcia",
            ),
            (
                "Call",
                "Follow-up call",
                "Followed up on recent purchase. Customer is satisfied with the product.",
                "James Wilson",
            ),
        ];

        let interactions: Vec<Interaction> = samples
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, (kind, subject, description, agent))| Interaction {
                id: format!("INT_{}_{}", i, stamp),
                kind: kind.to_string(),
                subject: subject.to_string(),
                description: description.to_string(),
                date: now - Duration::days(i as i64 * 3),
                agent: agent.to_string(),
            })
            .collect();

        tracing::info!(
            "Retrieved {} recent interactions for customer {}",
            interactions.len(),
            customer_id
        );
        Ok(interactions)
    }

    fn provider(&self) -> &CrmProvider {
        &self.provider
    }
}

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn seed_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "CUST12345".to_string(),
            name: "John Smith".to_string(),
            email: "john.smith@example.com".to_string(),
            phone: Some("555-123-4567".to_string()),
            company: "ABC Corp".to_string(),
            status: "Active".to_string(),
            plan: Some("Enterprise".to_string()),
            created_at: at("2022-01-15T10:30:00Z"),
            last_contact: Some(at("2023-09-28T14:45:00Z")),
            notes: Some("Frequent support requests about login issues".to_string()),
        },
        Customer {
            id: "CUST67890".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah.johnson@example.com".to_string(),
            phone: Some("555-987-6543".to_string()),
            company: "XYZ Inc".to_string(),
            status: "Active".to_string(),
            plan: Some("Professional".to_string()),
            created_at: at("2022-03-22T09:15:00Z"),
            last_contact: Some(at("2023-10-10T11:20:00Z")),
            notes: Some("Recently upgraded from Basic plan".to_string()),
        },
        Customer {
            id: "CUST24680".to_string(),
            name: "Michael Chen".to_string(),
            email: "michael.chen@example.com".to_string(),
            phone: Some("555-246-8024".to_string()),
            company: "Tech Solutions LLC".to_string(),
            status: "Active".to_string(),
            plan: Some("Professional".to_string()),
            created_at: at("2022-05-10T14:00:00Z"),
            last_contact: Some(at("2023-10-05T16:30:00Z")),
            notes: Some("Interested in API integration features".to_string()),
        },
        Customer {
            id: "CUST13579".to_string(),
            name: "David Wilson".to_string(),
            email: "david.wilson@acmecorp.com".to_string(),
            phone: Some("555-135-7913".to_string()),
            company: "Acme Corporation".to_string(),
            status: "Prospect".to_string(),
            plan: None,
            created_at: at("2023-09-15T10:00:00Z"),
            last_contact: Some(at("2023-10-08T15:45:00Z")),
            notes: Some("In sales pipeline, demo provided on Oct 5".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn crm() -> SimulatedCrm {
        SimulatedCrm::new(CrmProvider::Salesforce)
    }

    #[tokio::test]
    async fn test_get_seeded_customer() {
        let crm = crm();
        let prospect = crm.get_customer("CUST13579").await.unwrap().unwrap();
        assert_eq!(prospect.company, "Acme Corporation");
        assert_eq!(prospect.status, "Prospect");
        assert!(prospect.plan.is_none());
        assert!(crm.get_customer("CUST00000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_name_email_company() {
        let crm = crm();
        assert_eq!(crm.search_customers("JOHNSON").await.unwrap().len(), 1);
        assert_eq!(crm.search_customers("example.com").await.unwrap().len(), 3);
        assert_eq!(crm.search_customers("acme").await.unwrap().len(), 1);
        assert!(crm.search_customers("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_update_customer() {
        let crm = crm();
        let fields = json!({"name": "Emily Rodriguez", "email": "emily.rodriguez@example.com"});
        let id = crm
            .create_customer(fields.as_object().unwrap().clone())
            .await
            .unwrap();
        assert!(id.starts_with("CUST_"));

        let update = json!({"plan": "Education", "status": "Active"});
        assert!(crm
            .update_customer(&id, update.as_object().unwrap().clone())
            .await
            .unwrap());
        let customer = crm.get_customer(&id).await.unwrap().unwrap();
        assert_eq!(customer.plan.as_deref(), Some("Education"));
        assert_eq!(customer.name, "Emily Rodriguez");

        assert!(!crm
            .update_customer("CUST_missing", Map::new())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_entry_is_stored() {
        let crm = crm();
        let id = crm
            .create_entry(json!({"customer_name": "John Smith"}))
            .await
            .unwrap();
        assert!(id.starts_with("ENTRY_"));
        let entries = crm.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry["customer_name"], "John Smith");
    }

    #[tokio::test]
    async fn test_recent_interactions_capped_at_three() {
        let crm = crm();
        let all = crm.recent_interactions("CUST12345", 5).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind, "Email");
        assert_eq!(all[2].agent, "James Wilson");
        assert!(all[0].date > all[1].date);

        let one = crm.recent_interactions("CUST12345", 1).await.unwrap();
        assert_eq!(one.len(), 1);
    }
}
