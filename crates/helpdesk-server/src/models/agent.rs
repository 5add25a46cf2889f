//! Agent DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::application::{BatchFailure, BatchReport, BatchStatus, ChatReply};

/// Chat request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub customer_id: Option<String>,
}
