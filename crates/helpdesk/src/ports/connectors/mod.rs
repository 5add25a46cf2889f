//! Connector Ports
//!
//! Abstract interfaces for the business systems the agent works with.

mod crm;
mod email;
mod tickets;

pub use crm::*;
pub use email::*;
pub use tickets::*;
