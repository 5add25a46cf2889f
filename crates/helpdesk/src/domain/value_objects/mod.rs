//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod provider;
mod ticket_status;
mod vector_store;

pub use provider::*;
pub use ticket_status::*;
pub use vector_store::*;
