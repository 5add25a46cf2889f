//! Domain Services
//!
//! Pure helpers shared by the agent tools.

mod json;
mod text_splitter;

pub use json::*;
pub use text_splitter::*;
