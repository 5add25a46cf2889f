//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod knowledge_store;
mod memory_store;

pub use knowledge_store::*;
pub use memory_store::*;
