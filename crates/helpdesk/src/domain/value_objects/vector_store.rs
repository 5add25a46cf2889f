//! VectorStoreKind - Backend used for the knowledge base

use serde::{Deserialize, Serialize};

/// Vector store backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreKind {
    /// File-backed store on local disk
    #[default]
    Local,
    Qdrant,
}

impl std::fmt::Display for VectorStoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorStoreKind::Local => write!(f, "local"),
            VectorStoreKind::Qdrant => write!(f, "qdrant"),
        }
    }
}

impl std::str::FromStr for VectorStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            // chroma deployments are served by the local store
            "local" | "chroma" => Ok(VectorStoreKind::Local),
            "qdrant" => Ok(VectorStoreKind::Qdrant),
            _ => Err(format!("Unknown vector store type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chroma_maps_to_local() {
        assert_eq!(
            "Chroma".parse::<VectorStoreKind>().unwrap(),
            VectorStoreKind::Local
        );
        assert_eq!(
            "qdrant".parse::<VectorStoreKind>().unwrap(),
            VectorStoreKind::Qdrant
        );
        assert!("pinecone".parse::<VectorStoreKind>().is_err());
    }
}
