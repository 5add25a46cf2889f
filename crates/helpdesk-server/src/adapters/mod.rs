//! Infrastructure Adapters
//!
//! Concrete implementations of the port traits defined in `helpdesk`.

pub mod documents;
pub mod local_store;
pub mod memory_file;
pub mod openai;
pub mod qdrant;
pub mod simulated;

pub use local_store::LocalKnowledgeStore;
pub use memory_file::JsonFileMemoryStore;
pub use openai::{OpenAiChat, OpenAiEmbeddings};
pub use qdrant::QdrantKnowledgeStore;
pub use simulated::{SimulatedCrm, SimulatedMailbox, SimulatedTicketDesk};
