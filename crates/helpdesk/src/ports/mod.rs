//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the agent interacts with
//! external systems (LLMs, mailboxes, CRM, ticketing, storage).
//!
//! Implementations of these traits live in the server crate.

pub mod connectors;
pub mod repositories;
pub mod services;

// Re-exports
pub use connectors::*;
pub use repositories::*;
pub use services::*;
