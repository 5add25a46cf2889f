//! OpenAI adapters - Chat completions and embeddings over the REST API

use async_trait::async_trait;
use helpdesk::{
    ChatMessage, CompletionOptions, CompletionResponse, DomainError, EmbeddingService,
    LlmProvider, MessageRole, TokenUsage, ToolCall, ToolSpec,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const MISSING_KEY: &str = "OPENAI_API_KEY is not configured";

/// Chat model client (`/chat/completions`)
#[derive(Clone)]
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(api_key: String, base_url: &str, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<CompletionResponse, DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::Llm(MISSING_KEY.to_string()));
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::Llm(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::Llm(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Llm(format!("Invalid OpenAI response: {}", e)))?;

        body.into_completion()
    }
}

#[async_trait]
impl LlmProvider for OpenAiChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let request = ChatRequest::new(&self.model, messages, &[], options);
        self.send(&request).await
    }

    async fn complete_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let request = ChatRequest::new(&self.model, messages, tools, options);
        self.send(&request).await
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(!self.api_key.trim().is_empty())
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
}

impl<'a> ChatRequest<'a> {
    fn new(
        model: &'a str,
        messages: &[ChatMessage],
        tools: &'a [ToolSpec],
        options: &'a CompletionOptions,
    ) -> Self {
        Self {
            model,
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: options.stop_sequences.as_deref(),
            tools: tools
                .iter()
                .map(|tool| WireTool {
                    kind: "function",
                    function: WireFunctionSpec {
                        name: &tool.name,
                        description: &tool.description,
                        parameters: &tool.parameters,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: MessageRole,
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(message.tool_calls.iter().map(WireToolCall::from).collect())
        };
        // Assistant turns that only call tools carry no content
        let content = if tool_calls.is_some() && message.content.is_empty() {
            None
        } else {
            Some(message.content.clone())
        };
        Self {
            role: message.role,
            content,
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: function_kind(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(call: WireToolCall) -> Self {
        Self {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        }
    }
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionSpec<'a>,
}

#[derive(Serialize)]
struct WireFunctionSpec<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl ChatResponse {
    fn into_completion(self) -> Result<CompletionResponse, DomainError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Llm("No choices returned".to_string()))?;

        let usage = self
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: self.model,
            usage,
            finish_reason: choice.finish_reason,
            tool_calls: choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(ToolCall::from)
                .collect(),
        })
    }
}

// ============================================================================
// Embeddings
// ============================================================================

/// Embedding client (`/embeddings`)
#[derive(Clone)]
pub struct OpenAiEmbeddings {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: String, base_url: &str, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::ExternalService("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if self.api_key.trim().is_empty() {
            return Err(DomainError::ExternalService(MISSING_KEY.to_string()));
        }

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&EmbeddingRequest {
                input: texts,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        ordered_embeddings(body, texts.len())
    }
}

fn ordered_embeddings(
    mut body: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, DomainError> {
    if body.data.len() != expected {
        return Err(DomainError::ExternalService(format!(
            "Expected {} embeddings, got {}",
            expected,
            body.data.len()
        )));
    }
    body.data.sort_by_key(|d| d.index);
    Ok(body.data.into_iter().map(|d| d.embedding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_carries_tools_and_options() {
        let tools = vec![ToolSpec {
            name: "rag_tool".to_string(),
            description: "Look things up".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }];
        let options = CompletionOptions::with_temperature(0.1);
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let request = ChatRequest::new("gpt-4", &messages, &tools, &options);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "rag_tool");
        assert_eq!(body["max_tokens"], 4096);
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let options = CompletionOptions::default();
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest::new("gpt-4", &messages, &[], &options);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_tool_round_messages() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "ticket_router".to_string(),
            arguments: "{}".to_string(),
        };
        let assistant = WireMessage::from(&ChatMessage::assistant_with_tools("", vec![call]));
        let value = serde_json::to_value(&assistant).unwrap();
        assert!(value["content"].is_null());
        assert_eq!(value["tool_calls"][0]["function"]["name"], "ticket_router");

        let tool = WireMessage::from(&ChatMessage::tool("call_1", "{\"ok\":true}"));
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_1");
    }

    #[test]
    fn test_parse_tool_call_response() {
        let raw = json!({
            "model": "gpt-4-0613",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "rag_tool", "arguments": "{\"query\":\"refunds\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let response: ChatResponse = serde_json::from_value(raw).unwrap();
        let completion = response.into_completion().unwrap();
        assert_eq!(completion.content, "");
        assert_eq!(completion.finish_reason.as_deref(), Some("tool_calls"));
        assert_eq!(completion.tool_calls.len(), 1);
        assert_eq!(completion.tool_calls[0].name, "rag_tool");
        assert_eq!(completion.usage.total_tokens, 15);
    }

    #[test]
    fn test_empty_choices_is_error() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(response.into_completion().is_err());
    }

    #[test]
    fn test_embeddings_sorted_by_index() {
        let body: EmbeddingResponse = serde_json::from_value(json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        }))
        .unwrap();
        let vectors = ordered_embeddings(body, 2).unwrap();
        assert_eq!(vectors[0], vec![1.0, 0.0]);
        assert_eq!(vectors[1], vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let chat = OpenAiChat::new(String::new(), "https://api.openai.com/v1/", "gpt-4".into());
        let err = chat.complete_simple("hello").await.unwrap_err();
        assert!(err.to_string().contains(MISSING_KEY));
        assert!(!chat.health_check().await.unwrap());
    }
}
