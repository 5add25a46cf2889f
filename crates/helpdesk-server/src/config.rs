//! Settings - Runtime configuration from the environment
//!
//! Every key has a default so the server starts with an empty environment.
//! Malformed numbers are rejected at start-up.

use std::path::PathBuf;

use helpdesk::{CrmProvider, EmailProvider, TicketProvider, VectorStoreKind};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Server settings
#[derive(Debug, Clone)]
pub struct Settings {
    // LLM
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,

    // Agent
    pub agent_verbose: bool,
    pub agent_max_iterations: usize,

    // Email
    pub email_service_type: String,
    pub email_username: String,
    pub email_password: String,
    pub email_client_id: String,
    pub email_client_secret: String,
    pub email_tenant_id: String,
    pub email_batch_size: usize,
    pub email_poll_interval_secs: Option<u64>,

    // CRM
    pub crm_service_type: String,
    pub crm_api_key: String,
    pub crm_instance_url: String,
    pub crm_username: String,
    pub crm_password: String,

    // Ticketing
    pub ticket_service_type: String,
    pub ticket_api_key: String,
    pub ticket_subdomain: String,
    pub ticket_email: String,

    // Knowledge base
    pub rag_enabled: bool,
    pub rag_vector_store_type: String,
    pub rag_vector_store_path: PathBuf,
    pub rag_vector_store_url: Option<String>,
    pub rag_vector_store_api_key: Option<String>,
    pub rag_collection: String,
    pub rag_embedding_model: String,
    pub rag_embedding_dimensions: u64,

    // Memory
    pub memory_file_path: PathBuf,

    // API
    pub api_host: String,
    pub api_port: u16,
    pub api_debug: bool,
    pub api_key: Option<String>,
    pub log_level: String,

    // Routing vocabulary
    pub departments: Vec<String>,
    pub ticket_priorities: Vec<String>,
    pub ticket_categories: Vec<String>,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = Source { lookup };

        Ok(Self {
            openai_api_key: source.string("OPENAI_API_KEY", ""),
            openai_base_url: source.string("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            llm_model: source.string("LLM_MODEL", "gpt-4"),
            llm_temperature: source.parse("LLM_TEMPERATURE", 0.2)?,

            agent_verbose: source.flag("AGENT_VERBOSE", false),
            agent_max_iterations: source.parse("AGENT_MAX_ITERATIONS", 5)?,

            email_service_type: source.string("EMAIL_SERVICE_TYPE", "gmail"),
            email_username: source.string("EMAIL_USERNAME", ""),
            email_password: source.string("EMAIL_PASSWORD", ""),
            email_client_id: source.string("EMAIL_CLIENT_ID", ""),
            email_client_secret: source.string("EMAIL_CLIENT_SECRET", ""),
            email_tenant_id: source.string("EMAIL_TENANT_ID", ""),
            email_batch_size: source.parse("EMAIL_BATCH_SIZE", 10)?,
            email_poll_interval_secs: source.parse_optional("EMAIL_POLL_INTERVAL_SECS")?,

            crm_service_type: source.string("CRM_SERVICE_TYPE", "salesforce"),
            crm_api_key: source.string("CRM_API_KEY", ""),
            crm_instance_url: source.string("CRM_INSTANCE_URL", ""),
            crm_username: source.string("CRM_USERNAME", ""),
            crm_password: source.string("CRM_PASSWORD", ""),

            ticket_service_type: source.string("TICKET_SERVICE_TYPE", "zendesk"),
            ticket_api_key: source.string("TICKET_API_KEY", ""),
            ticket_subdomain: source.string("TICKET_SUBDOMAIN", ""),
            ticket_email: source.string("TICKET_EMAIL", ""),

            rag_enabled: source.flag("RAG_ENABLED", true),
            rag_vector_store_type: source.string("RAG_VECTOR_STORE_TYPE", "local"),
            rag_vector_store_path: PathBuf::from(
                source.string("RAG_VECTOR_STORE_PATH", "./vector_store"),
            ),
            rag_vector_store_url: source.optional("RAG_VECTOR_STORE_URL"),
            rag_vector_store_api_key: source.optional("RAG_VECTOR_STORE_API_KEY"),
            rag_collection: source.string("RAG_COLLECTION", "knowledge_base"),
            rag_embedding_model: source.string("RAG_EMBEDDING_MODEL", "text-embedding-ada-002"),
            rag_embedding_dimensions: source.parse("RAG_EMBEDDING_DIMENSIONS", 1536)?,

            memory_file_path: PathBuf::from(source.string("MEMORY_FILE_PATH", "agent_memory.json")),

            api_host: source.string("API_HOST", "0.0.0.0"),
            api_port: source.parse("API_PORT", 8000)?,
            api_debug: source.flag("API_DEBUG", false),
            api_key: source.optional("API_KEY"),
            log_level: source.string("LOG_LEVEL", "INFO"),

            departments: source.list("DEPARTMENTS", "Sales,Support,Billing,Technical,General"),
            ticket_priorities: source.list("TICKET_PRIORITIES", "Low,Medium,High,Critical"),
            ticket_categories: source.list(
                "TICKET_CATEGORIES",
                "Account,Billing,Product,Technical,Feature Request,Bug",
            ),
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn email_provider(&self) -> EmailProvider {
        parse_infallible(&self.email_service_type)
    }

    pub fn crm_provider(&self) -> CrmProvider {
        parse_infallible(&self.crm_service_type)
    }

    pub fn ticket_provider(&self) -> TicketProvider {
        parse_infallible(&self.ticket_service_type)
    }

    /// Vector store backend, `None` for unknown names
    pub fn vector_store_kind(&self) -> Option<VectorStoreKind> {
        self.rag_vector_store_type.parse().ok()
    }

    /// Log filter used when RUST_LOG is not set
    pub fn default_log_filter(&self) -> String {
        let level = self.log_level.trim().to_lowercase();
        let level = match level.as_str() {
            "warning" => "warn",
            "critical" | "fatal" => "error",
            "" => "info",
            other => other,
        };
        format!("helpdesk_server={level},helpdesk={level},tower_http={level}")
    }

    pub fn llm_configured(&self) -> bool {
        !self.openai_api_key.trim().is_empty()
    }
}

fn parse_infallible<T>(value: &str) -> T
where
    T: std::str::FromStr<Err = std::convert::Infallible>,
{
    match value.parse() {
        Ok(parsed) => parsed,
        Err(never) => match never {},
    }
}

struct Source<F> {
    lookup: F,
}

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        (self.lookup)(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match (self.lookup)(key) {
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    fn list(&self, key: &str, default: &str) -> Vec<String> {
        let raw = self.string(key, default);
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn parse<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_optional(key)?.unwrap_or(default))
    }

    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = self.optional(key) else {
            return Ok(None);
        };
        value
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.llm_model, "gpt-4");
        assert_eq!(s.llm_temperature, 0.2);
        assert_eq!(s.agent_max_iterations, 5);
        assert_eq!(s.email_batch_size, 10);
        assert!(s.email_poll_interval_secs.is_none());
        assert!(s.rag_enabled);
        assert_eq!(s.rag_collection, "knowledge_base");
        assert_eq!(s.rag_embedding_dimensions, 1536);
        assert_eq!(s.bind_address(), "0.0.0.0:8000");
        assert!(s.api_key.is_none());
        assert_eq!(
            s.departments,
            vec!["Sales", "Support", "Billing", "Technical", "General"]
        );
        assert_eq!(s.ticket_categories.len(), 6);
        assert_eq!(s.email_provider(), EmailProvider::Gmail);
        assert_eq!(s.crm_provider(), CrmProvider::Salesforce);
        assert_eq!(s.ticket_provider(), TicketProvider::Zendesk);
        assert_eq!(s.vector_store_kind(), Some(VectorStoreKind::Local));
        assert!(!s.llm_configured());
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("API_PORT", "9000"),
            ("RAG_ENABLED", "False"),
            ("AGENT_VERBOSE", "TRUE"),
            ("DEPARTMENTS", " Sales , ,Support "),
            ("EMAIL_SERVICE_TYPE", "graph"),
            ("RAG_VECTOR_STORE_TYPE", "chroma"),
            ("EMAIL_POLL_INTERVAL_SECS", "300"),
            ("API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(s.api_port, 9000);
        assert!(!s.rag_enabled);
        assert!(s.agent_verbose);
        assert_eq!(s.departments, vec!["Sales", "Support"]);
        assert_eq!(s.email_provider(), EmailProvider::MicrosoftGraph);
        assert_eq!(s.vector_store_kind(), Some(VectorStoreKind::Local));
        assert_eq!(s.email_poll_interval_secs, Some(300));
        assert_eq!(s.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let err = settings(&[("API_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
        assert!(settings(&[("LLM_TEMPERATURE", "hot")]).is_err());
    }

    #[test]
    fn test_log_filter_from_level() {
        let s = settings(&[("LOG_LEVEL", "WARNING")]).unwrap();
        assert_eq!(
            s.default_log_filter(),
            "helpdesk_server=warn,helpdesk=warn,tower_http=warn"
        );
    }
}
