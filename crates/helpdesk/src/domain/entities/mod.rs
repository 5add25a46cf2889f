//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Email: Inbound and outbound mail
//! - Customer: CRM customer records, interactions and entries
//! - Ticket: Support tickets and comments
//! - Conversation: Agent memory messages
//! - Knowledge: Knowledge base chunks for retrieval

mod conversation;
mod customer;
mod email;
mod knowledge;
mod ticket;

pub use conversation::*;
pub use customer::*;
pub use email::*;
pub use knowledge::*;
pub use ticket::*;
