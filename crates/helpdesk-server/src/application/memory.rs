//! Agent Memory
//!
//! Conversation history and per-customer context, persisted through a
//! `MemoryStore` after every change. Persistence failures are logged and
//! the in-memory state stays authoritative.

use std::sync::Arc;

use chrono::Utc;
use helpdesk::{ConversationMessage, CustomerContext, MemorySnapshot, MemoryStore};
use serde_json::Value;
use tokio::sync::RwLock;

/// Default number of messages returned by `relevant_history`
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

pub struct AgentMemory {
    store: Arc<dyn MemoryStore>,
    state: RwLock<MemorySnapshot>,
}

impl AgentMemory {
    /// Load memory from the store; a failed load starts empty
    pub async fn load(store: Arc<dyn MemoryStore>) -> Self {
        let snapshot = match store.load().await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    "🧠 Loaded memory: {} messages, {} customer contexts",
                    snapshot.messages.len(),
                    snapshot.customer_contexts.len()
                );
                snapshot
            }
            Ok(None) => {
                tracing::info!("🧠 No saved memory found, starting fresh");
                MemorySnapshot::default()
            }
            Err(e) => {
                tracing::error!("Error loading memory: {}", e);
                MemorySnapshot::default()
            }
        };

        Self {
            store,
            state: RwLock::new(snapshot),
        }
    }

    /// Record one exchange
    pub async fn save_context(&self, input: &str, output: &str, customer_id: Option<&str>) {
        let mut state = self.state.write().await;
        let customer_id = customer_id.map(str::to_string);
        state
            .messages
            .push(ConversationMessage::human(input, customer_id.clone()));
        state
            .messages
            .push(ConversationMessage::ai(output, customer_id));
        self.persist(&mut state).await;
    }

    /// Forget the conversation; customer contexts are kept
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.messages.clear();
        self.persist(&mut state).await;
        tracing::info!("Memory cleared");
    }

    pub async fn customer_context(&self, customer_id: &str) -> CustomerContext {
        self.state
            .read()
            .await
            .customer_contexts
            .get(customer_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Merge keys into a customer's context and return the result
    pub async fn update_customer_context(
        &self,
        customer_id: &str,
        data: CustomerContext,
    ) -> CustomerContext {
        let mut state = self.state.write().await;
        let context = state
            .customer_contexts
            .entry(customer_id.to_string())
            .or_default();
        context.extend(data);
        context.insert(
            "last_updated".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        let merged = context.clone();

        self.persist(&mut state).await;
        tracing::info!("Updated context for customer {}", customer_id);
        merged
    }

    /// The last `max` messages, only that customer's when one is given
    pub async fn relevant_history(
        &self,
        customer_id: Option<&str>,
        max: usize,
    ) -> Vec<ConversationMessage> {
        let state = self.state.read().await;
        let relevant: Vec<&ConversationMessage> = state
            .messages
            .iter()
            .filter(|m| customer_id.map_or(true, |id| m.customer_id.as_deref() == Some(id)))
            .collect();

        let skip = relevant.len().saturating_sub(max);
        relevant.into_iter().skip(skip).cloned().collect()
    }

    pub async fn history(&self) -> Vec<ConversationMessage> {
        self.state.read().await.messages.clone()
    }

    async fn persist(&self, state: &mut MemorySnapshot) {
        state.last_updated = Some(Utc::now().to_rfc3339());
        if let Err(e) = self.store.save(state).await {
            tracing::error!("Error saving memory: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonFileMemoryStore;
    use async_trait::async_trait;
    use helpdesk::{DomainError, MessageKind};
    use serde_json::json;

    struct BrokenStore;

    #[async_trait]
    impl MemoryStore for BrokenStore {
        async fn load(&self) -> Result<Option<MemorySnapshot>, DomainError> {
            Err(DomainError::Parse("corrupt".to_string()))
        }

        async fn save(&self, _snapshot: &MemorySnapshot) -> Result<(), DomainError> {
            Err(DomainError::Repository("read-only".to_string()))
        }
    }

    fn context(value: Value) -> CustomerContext {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_save_context_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");

        let memory = AgentMemory::load(Arc::new(JsonFileMemoryStore::new(&path))).await;
        memory
            .save_context("Where is my refund?", "It was issued today.", Some("CUST67890"))
            .await;

        let reloaded = AgentMemory::load(Arc::new(JsonFileMemoryStore::new(&path))).await;
        let history = reloaded.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, MessageKind::Human);
        assert_eq!(history[1].kind, MessageKind::Ai);
        assert_eq!(history[1].customer_id.as_deref(), Some("CUST67890"));

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["messages"][0]["type"], "human");
        assert!(raw["last_updated"].is_string());
    }

    #[tokio::test]
    async fn test_relevant_history_filters_and_limits() {
        let dir = tempfile::tempdir().unwrap();
        let memory =
            AgentMemory::load(Arc::new(JsonFileMemoryStore::new(dir.path().join("m.json")))).await;
        for i in 0..3 {
            memory
                .save_context(&format!("a{}", i), "ok", Some("CUST12345"))
                .await;
        }
        memory.save_context("b", "ok", Some("CUST67890")).await;
        memory.save_context("anon", "ok", None).await;

        let all = memory.relevant_history(None, DEFAULT_HISTORY_LIMIT).await;
        assert_eq!(all.len(), 10);
        assert_eq!(all[9].content, "ok");
        assert_eq!(all[8].content, "anon");

        let customer = memory.relevant_history(Some("CUST12345"), 3).await;
        assert_eq!(customer.len(), 3);
        assert_eq!(customer[0].content, "ok");
        assert_eq!(customer[1].content, "a2");

        assert!(memory.relevant_history(Some("CUST00000"), 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_customer_context_merges_and_survives_clear() {
        let dir = tempfile::tempdir().unwrap();
        let memory =
            AgentMemory::load(Arc::new(JsonFileMemoryStore::new(dir.path().join("m.json")))).await;

        assert!(memory.customer_context("CUST12345").await.is_empty());

        memory
            .update_customer_context("CUST12345", context(json!({"plan": "Premium"})))
            .await;
        let merged = memory
            .update_customer_context("CUST12345", context(json!({"tier": "gold"})))
            .await;
        assert_eq!(merged["plan"], "Premium");
        assert_eq!(merged["tier"], "gold");
        assert!(merged["last_updated"].is_string());

        memory.save_context("hi", "hello", Some("CUST12345")).await;
        memory.clear().await;

        assert!(memory.history().await.is_empty());
        assert_eq!(memory.customer_context("CUST12345").await["plan"], "Premium");
    }

    #[tokio::test]
    async fn test_store_failures_are_not_fatal() {
        let memory = AgentMemory::load(Arc::new(BrokenStore)).await;
        memory.save_context("hi", "hello", None).await;
        assert_eq!(memory.history().await.len(), 2);
    }
}
