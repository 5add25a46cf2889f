//! JSON file persistence for agent memory

use std::path::PathBuf;

use async_trait::async_trait;
use helpdesk::{DomainError, MemorySnapshot, MemoryStore};

pub struct JsonFileMemoryStore {
    path: PathBuf,
}

impl JsonFileMemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_err(&self, e: std::io::Error) -> DomainError {
        DomainError::Repository(format!("{}: {}", self.path.display(), e))
    }
}

#[async_trait]
impl MemoryStore for JsonFileMemoryStore {
    async fn load(&self) -> Result<Option<MemorySnapshot>, DomainError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let snapshot: MemorySnapshot = serde_json::from_str(&raw)?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &MemorySnapshot) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        let raw = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| self.io_err(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk::ConversationMessage;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path().join("memory.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path().join("nested/memory.json"));

        let mut snapshot = MemorySnapshot::default();
        snapshot
            .messages
            .push(ConversationMessage::human("Where is my invoice?", None));
        snapshot.last_updated = Some("2024-01-01T00:00:00Z".to_string());
        store.save(&snapshot).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        let raw = std::fs::read_to_string(dir.path().join("nested/memory.json")).unwrap();
        assert!(raw.contains("\"type\": \"human\""));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileMemoryStore::new(path);
        assert!(store.load().await.is_err());
    }
}
