//! Helpdesk Domain Library
//!
//! Core domain types and interfaces for the Helpdesk customer service agent.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Email, Ticket, Customer, CrmRecord, ...)
//!   - `value_objects/`: Immutable value types (providers, ticket status)
//!   - `services/`: Pure helpers (JSON extraction, text splitting)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `connectors/`: Email, CRM and ticketing systems
//!   - `repositories/`: Knowledge base and agent memory storage
//!   - `services/`: LLM and embedding providers
//!
//! # Usage
//!
//! ```rust,ignore
//! use helpdesk::domain::{Email, Ticket};
//! use helpdesk::ports::{LlmProvider, TicketConnector};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    extract_json_object, parse_support_verdict, ConversationMessage, CrmProvider, CrmRecord,
    Customer, CustomerContext, DomainError, Email, EmailProvider, Interaction, KnowledgeChunk,
    MessageKind, OutgoingEmail, ScoredChunk, TextSplitter, Ticket, TicketComment, TicketDraft,
    TicketFilter, TicketProvider, TicketStatus, VectorStoreKind,
};
pub use ports::{
    // Services
    ChatMessage,
    CompletionOptions,
    CompletionResponse,
    // Connectors
    CrmConnector,
    EmailConnector,
    EmbeddingService,
    // Repositories
    KnowledgeStore,
    LlmProvider,
    MemorySnapshot,
    MemoryStore,
    MessageRole,
    TicketConnector,
    TokenUsage,
    ToolCall,
    ToolSpec,
};
