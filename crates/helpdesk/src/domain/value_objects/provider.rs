//! Provider - External systems the agent connects to
//!
//! Provider names come from configuration. Unknown names never fail to
//! parse; they become `Unsupported` so the caller can warn and fall back.

use serde::{Deserialize, Serialize};

/// Mailbox provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailProvider {
    Gmail,
    /// Outlook / Microsoft Graph
    MicrosoftGraph,
    Unsupported(String),
}

impl std::fmt::Display for EmailProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailProvider::Gmail => write!(f, "gmail"),
            EmailProvider::MicrosoftGraph => write!(f, "outlook"),
            EmailProvider::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

impl std::str::FromStr for EmailProvider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "gmail" => EmailProvider::Gmail,
            "outlook" | "graph" => EmailProvider::MicrosoftGraph,
            other => EmailProvider::Unsupported(other.to_string()),
        })
    }
}

/// CRM provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CrmProvider {
    Salesforce,
    HubSpot,
    Unsupported(String),
}

impl std::fmt::Display for CrmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrmProvider::Salesforce => write!(f, "salesforce"),
            CrmProvider::HubSpot => write!(f, "hubspot"),
            CrmProvider::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

impl std::str::FromStr for CrmProvider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "salesforce" => CrmProvider::Salesforce,
            "hubspot" => CrmProvider::HubSpot,
            other => CrmProvider::Unsupported(other.to_string()),
        })
    }
}

/// Ticketing system provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketProvider {
    Zendesk,
    Freshdesk,
    Unsupported(String),
}

impl std::fmt::Display for TicketProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketProvider::Zendesk => write!(f, "zendesk"),
            TicketProvider::Freshdesk => write!(f, "freshdesk"),
            TicketProvider::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

impl std::str::FromStr for TicketProvider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "zendesk" => TicketProvider::Zendesk,
            "freshdesk" => TicketProvider::Freshdesk,
            other => TicketProvider::Unsupported(other.to_string()),
        })
    }
}

impl EmailProvider {
    pub fn is_supported(&self) -> bool {
        !matches!(self, EmailProvider::Unsupported(_))
    }
}

impl CrmProvider {
    pub fn is_supported(&self) -> bool {
        !matches!(self, CrmProvider::Unsupported(_))
    }
}

impl TicketProvider {
    pub fn is_supported(&self) -> bool {
        !matches!(self, TicketProvider::Unsupported(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_provider_aliases() {
        let graph: EmailProvider = "Graph".parse().unwrap();
        let outlook: EmailProvider = "OUTLOOK".parse().unwrap();
        assert_eq!(graph, EmailProvider::MicrosoftGraph);
        assert_eq!(outlook, EmailProvider::MicrosoftGraph);
    }

    #[test]
    fn test_unknown_provider_is_unsupported() {
        let crm: CrmProvider = "pipedrive".parse().unwrap();
        assert_eq!(crm, CrmProvider::Unsupported("pipedrive".to_string()));
        assert!(!crm.is_supported());

        let tickets: TicketProvider = "Freshdesk".parse().unwrap();
        assert!(tickets.is_supported());
    }
}
