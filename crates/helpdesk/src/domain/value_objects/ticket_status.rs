//! TicketStatus - Lifecycle state of a support ticket

use serde::{Deserialize, Serialize};

/// Ticket status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum TicketStatus {
    #[default]
    Open,
    Pending,
    Closed,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "Open"),
            TicketStatus::Pending => write!(f, "Pending"),
            TicketStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "pending" => Ok(TicketStatus::Pending),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(format!("Unknown ticket status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("OPEN".parse::<TicketStatus>().unwrap(), TicketStatus::Open);
        assert_eq!(
            " pending ".parse::<TicketStatus>().unwrap(),
            TicketStatus::Pending
        );
        assert!("resolved".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_serializes_capitalized() {
        let json = serde_json::to_string(&TicketStatus::Closed).unwrap();
        assert_eq!(json, "\"Closed\"");
    }
}
