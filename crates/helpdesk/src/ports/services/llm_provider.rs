//! LLM Provider Port
//!
//! Abstract interface for chat model invocations, including
//! function calling used by the conversational agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    /// Result of a tool invocation
    Tool,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Call this message answers (tool role only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: String) -> Self {
        Self {
            role,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content.into())
    }

    /// Assistant turn that requested tool calls
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::new(MessageRole::Assistant, content.into())
        }
    }

    /// Result of a tool call
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(MessageRole::Tool, content.into())
        }
    }
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments as produced by the model
    pub arguments: String,
}

/// A function the model may call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: serde_json::Value,
}

/// Options for LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Top-p sampling
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: Some(4096),
            temperature: Some(0.7),
            top_p: None,
            stop_sequences: None,
        }
    }
}

impl CompletionOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Default::default()
        }
    }
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
    /// Tool calls requested instead of (or alongside) content
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// LLM Provider interface
///
/// # Example
///
/// ```rust,ignore
/// use helpdesk::ports::LlmProvider;
///
/// struct OpenAiChat { /* ... */ }
///
/// #[async_trait]
/// impl LlmProvider for OpenAiChat {
///     async fn complete(&self, messages: &[ChatMessage], options: &CompletionOptions)
///         -> Result<CompletionResponse, DomainError> {
///         // POST /chat/completions
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError>;

    /// Generate a completion that may request tool calls.
    ///
    /// Providers without function calling ignore the tools.
    async fn complete_with_tools(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolSpec],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        self.complete(messages, options).await
    }

    /// Generate a simple completion from a single prompt
    async fn complete_simple(&self, prompt: &str) -> Result<String, DomainError> {
        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .complete(&messages, &CompletionOptions::default())
            .await?;
        Ok(response.content)
    }

    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;

    /// Check if the provider is available and healthy
    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            options: &CompletionOptions,
        ) -> Result<CompletionResponse, DomainError> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(CompletionResponse {
                content: format!("{} @ {:?}", last, options.temperature),
                model: "echo".to_string(),
                usage: TokenUsage::default(),
                finish_reason: Some("stop".to_string()),
                tool_calls: Vec::new(),
            })
        }

        fn provider_name(&self) -> &str {
            "echo"
        }

        fn model_id(&self) -> &str {
            "echo-1"
        }
    }

    #[tokio::test]
    async fn test_complete_simple_uses_defaults() {
        let reply = EchoProvider.complete_simple("hello").await.unwrap();
        assert_eq!(reply, "hello @ Some(0.7)");
    }

    #[tokio::test]
    async fn test_tools_ignored_without_function_calling() {
        let tools = vec![ToolSpec {
            name: "rag_tool".to_string(),
            description: "lookup".to_string(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let response = EchoProvider
            .complete_with_tools(
                &[ChatMessage::user("hi")],
                &tools,
                &CompletionOptions::with_temperature(0.1),
            )
            .await
            .unwrap();
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.content, "hi @ Some(0.1)");
    }

    #[test]
    fn test_tool_message_serialization() {
        let msg = ChatMessage::tool("call_1", "done");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_1");
        assert!(json.get("tool_calls").is_none());
    }
}
