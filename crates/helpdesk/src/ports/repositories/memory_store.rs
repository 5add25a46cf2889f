//! Memory Store Port
//!
//! Persistence for the agent's conversation memory.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{errors::DomainError, ConversationMessage, CustomerContext};

/// Everything the agent remembers between restarts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    #[serde(default)]
    pub customer_contexts: HashMap<String, CustomerContext>,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    /// RFC 3339 time of the last save
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Repository interface for agent memory
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Load the saved snapshot, if one exists
    async fn load(&self) -> Result<Option<MemorySnapshot>, DomainError>;

    /// Replace the saved snapshot
    async fn save(&self, snapshot: &MemorySnapshot) -> Result<(), DomainError>;
}
