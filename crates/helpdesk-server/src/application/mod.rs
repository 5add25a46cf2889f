//! Application Layer (Use Cases)
//!
//! The customer service agent, its memory and the email batch runner.

pub mod agent;
pub mod batch;
pub mod memory;

pub use agent::{
    AgentConfig, BatchFailure, BatchReport, ChatReply, Connectors, CustomerServiceAgent,
};
pub use batch::{BatchRunner, BatchStatus};
pub use memory::AgentMemory;
