//! Helpdesk API Models
//!
//! - Support: email, ticket, CRM and routing DTOs
//! - Agent: chat and batch processing
//! - Knowledge: retrieval and ingestion
//! - Memory: customer context and conversation history

mod agent;
mod knowledge;
mod memory;
mod support;

pub use agent::*;
pub use knowledge::*;
pub use memory::*;
pub use support::*;
