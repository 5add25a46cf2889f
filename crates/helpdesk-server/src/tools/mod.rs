//! Agent Tools
//!
//! LLM-backed tools used directly by the API and through function calling
//! by the chat agent:
//! - `email_summarizer`: key points and action items from an email
//! - `ticket_router`: ticket categorization, query routing, support detection
//! - `crm_entry_generator`: structured CRM entries from interactions
//! - `rag_tool`: answers from the knowledge base
//!
//! Tools degrade instead of failing: LLM or parse errors come back as
//! fallback values carrying an `error` field.

pub mod crm_entry;
pub mod knowledge;
pub mod registry;
pub mod summarizer;
pub mod ticket_router;

use async_trait::async_trait;
use helpdesk::{ChatMessage, CompletionOptions, DomainError, LlmProvider, ToolSpec};
use serde_json::{Map, Value};

pub use crm_entry::{CrmEntryGenerator, CrmEntryInput};
pub use knowledge::{KnowledgeTool, RagQueryInput};
pub use registry::ToolRegistry;
pub use summarizer::{EmailInput, EmailSummarizer};
pub use ticket_router::{QueryInput, RoutingVocabulary, TicketInput, TicketRouter};

/// A function the chat agent can call
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the arguments object
    fn parameters(&self) -> Value;

    /// Run the tool with model-supplied arguments
    async fn invoke(&self, args: Value) -> Result<Value, DomainError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Send a system + human prompt pair and return the reply text
pub(crate) async fn ask(
    llm: &dyn LlmProvider,
    system: &str,
    human: String,
    temperature: f32,
) -> Result<String, DomainError> {
    let messages = [ChatMessage::system(system), ChatMessage::user(human)];
    let response = llm
        .complete(&messages, &CompletionOptions::with_temperature(temperature))
        .await?;
    Ok(response.content)
}

/// `None` for an empty map, indented JSON otherwise
pub(crate) fn pretty_or_none(map: Option<&Map<String, Value>>) -> String {
    match map {
        Some(map) if !map.is_empty() => {
            serde_json::to_string_pretty(map).unwrap_or_else(|_| "None".to_string())
        }
        _ => "None".to_string(),
    }
}

/// Read a string field, tolerating the capitalized keys models sometimes emit
pub fn field_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    let object = value.as_object()?;
    object
        .get(key)
        .or_else(|| {
            object
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
        .and_then(Value::as_str)
}

pub(crate) fn invalid_args(tool: &str, e: serde_json::Error) -> DomainError {
    DomainError::Validation(format!("Invalid arguments for {}: {}", tool, e))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted LLM double shared by tool and agent tests

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use helpdesk::{
        ChatMessage, CompletionOptions, CompletionResponse, DomainError, LlmProvider,
        TokenUsage, ToolCall, ToolSpec,
    };

    /// One scripted model turn
    pub enum Reply {
        Text(String),
        Calls(Vec<ToolCall>),
        Fail(String),
    }

    /// Replays scripted replies in order and records every request
    #[derive(Default)]
    pub struct ScriptedLlm {
        replies: Mutex<VecDeque<Reply>>,
        pub requests: Mutex<Vec<(Vec<ChatMessage>, Option<f32>)>>,
    }

    impl ScriptedLlm {
        pub fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn text(reply: &str) -> Self {
            Self::new(vec![Reply::Text(reply.to_string())])
        }

        pub fn failing(error: &str) -> Self {
            Self::new(vec![Reply::Fail(error.to_string())])
        }

        pub fn last_prompt(&self) -> String {
            self.requests
                .lock()
                .unwrap()
                .last()
                .and_then(|(messages, _)| messages.last().map(|m| m.content.clone()))
                .unwrap_or_default()
        }

        pub fn last_temperature(&self) -> Option<f32> {
            self.requests
                .lock()
                .unwrap()
                .last()
                .and_then(|(_, temperature)| *temperature)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            options: &CompletionOptions,
        ) -> Result<CompletionResponse, DomainError> {
            self.requests
                .lock()
                .unwrap()
                .push((messages.to_vec(), options.temperature));

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Reply::Text("No".to_string()));

            let (content, tool_calls) = match reply {
                Reply::Text(text) => (text, Vec::new()),
                Reply::Calls(calls) => (String::new(), calls),
                Reply::Fail(error) => return Err(DomainError::Llm(error)),
            };

            Ok(CompletionResponse {
                content,
                model: "scripted".to_string(),
                usage: TokenUsage::default(),
                finish_reason: Some("stop".to_string()),
                tool_calls,
            })
        }

        async fn complete_with_tools(
            &self,
            messages: &[ChatMessage],
            _tools: &[ToolSpec],
            options: &CompletionOptions,
        ) -> Result<CompletionResponse, DomainError> {
            self.complete(messages, options).await
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model_id(&self) -> &str {
            "scripted-1"
        }
    }
}
