//! Simulated connectors
//!
//! Stateful in-memory stand-ins for the mailbox, CRM and ticketing
//! providers, seeded with sample data.
//!
//! The agent drives fetch, mark-processed, entry and ticket creation.
//! The rest of each connector (outbox, customer lookup and updates,
//! ticket queries and comments) is the provider surface available to
//! further tools and is exercised by the tests in each module.

mod crm;
mod email;
mod tickets;

pub use crm::SimulatedCrm;
pub use email::SimulatedMailbox;
pub use tickets::SimulatedTicketDesk;

/// `<PREFIX>_<yyyymmddHHMMSS>_<8 hex>`
pub(crate) fn generate_id(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        prefix,
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        &suffix[..8]
    )
}

/// Merge JSON fields into a record, keeping its `id`
pub(crate) fn merge_fields<T>(
    record: &T,
    fields: &serde_json::Map<String, serde_json::Value>,
) -> Result<T, helpdesk::DomainError>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let mut value = serde_json::to_value(record)?;
    if let Some(object) = value.as_object_mut() {
        for (key, field) in fields {
            if key != "id" {
                object.insert(key.clone(), field.clone());
            }
        }
    }
    serde_json::from_value(value).map_err(|e| helpdesk::DomainError::Validation(e.to_string()))
}
