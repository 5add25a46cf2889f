//! Helpdesk API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API Client for Helpdesk
pub struct HelpdeskClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub llm_model: String,
    #[serde(default)]
    pub rag_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct EmailRequest {
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketRequest {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CrmEntryRequest {
    pub customer_name: String,
    pub interaction_details: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub additional_info: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub output: String,
    #[serde(default)]
    pub tools_used: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchFailure {
    pub email_id: String,
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchReport {
    pub started_at: String,
    pub finished_at: String,
    pub fetched: usize,
    pub processed: usize,
    pub tickets_created: usize,
    pub crm_entries_created: usize,
    #[serde(default)]
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Deserialize)]
pub struct BatchStatus {
    pub running: bool,
    pub last_report: Option<BatchReport>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct CrmEntryResponse {
    crm_entry: Value,
}

#[derive(Debug, Deserialize)]
struct KnowledgeAnswer {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct AddDocumentsResponse {
    chunks_added: usize,
}

impl HelpdeskClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(|k| k.to_string()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let resp = self
            .authorized(request)
            .send()
            .await
            .context("Failed to connect to Helpdesk API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        Ok(resp)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send(self.client.get(self.url(path))).await?;
        resp.json().await.context("Failed to parse response")
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        resp.json().await.context("Failed to parse response")
    }

    /// Fetch the health report (no authentication)
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to connect to Helpdesk API")?;

        if !resp.status().is_success() {
            bail!("API error ({})", resp.status());
        }

        resp.json().await.context("Failed to parse response")
    }

    pub async fn summarize_email(&self, email: &EmailRequest) -> Result<String> {
        let resp: SummaryResponse = self.post("/summarize-email", email).await?;
        Ok(resp.summary)
    }

    pub async fn categorize_ticket(&self, ticket: &TicketRequest) -> Result<Value> {
        self.post("/categorize-ticket", ticket).await
    }

    pub async fn create_crm_entry(&self, entry: &CrmEntryRequest) -> Result<Value> {
        let resp: CrmEntryResponse = self.post("/create-crm-entry", entry).await?;
        Ok(resp.crm_entry)
    }

    pub async fn route_query(&self, query: &str, customer_id: Option<&str>) -> Result<Value> {
        let body = serde_json::json!({ "query": query, "customer_id": customer_id });
        self.post("/route-query", &body).await
    }

    pub async fn chat(&self, message: &str, customer_id: Option<&str>) -> Result<ChatReply> {
        let body = serde_json::json!({ "message": message, "customer_id": customer_id });
        self.post("/chat", &body).await
    }

    pub async fn start_batch(&self) -> Result<String> {
        let resp: MessageResponse = self
            .post("/process-email-batch", &serde_json::json!({}))
            .await?;
        Ok(resp.message)
    }

    pub async fn batch_status(&self) -> Result<BatchStatus> {
        self.get("/process-email-batch/status").await
    }

    pub async fn query_knowledge(&self, query: &str, max_results: Option<usize>) -> Result<String> {
        let body = serde_json::json!({ "query": query, "max_results": max_results });
        let resp: KnowledgeAnswer = self.post("/knowledge/query", &body).await?;
        Ok(resp.answer)
    }

    /// Ingest a path on the server
    pub async fn ingest_path(&self, path: &str) -> Result<usize> {
        let body = serde_json::json!({ "path": path });
        let resp: AddDocumentsResponse = self.post("/knowledge/documents", &body).await?;
        Ok(resp.chunks_added)
    }

    /// Ingest text read on this machine
    pub async fn add_text(&self, source: &str, text: &str) -> Result<usize> {
        let body = serde_json::json!({ "source": source, "text": text });
        let resp: AddDocumentsResponse = self.post("/knowledge/documents", &body).await?;
        Ok(resp.chunks_added)
    }

    pub async fn customer_context(&self, customer_id: &str) -> Result<Map<String, Value>> {
        self.get(&format!("/customers/{}/context", customer_id))
            .await
    }

    pub async fn update_customer_context(
        &self,
        customer_id: &str,
        data: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let request = self
            .client
            .put(self.url(&format!("/customers/{}/context", customer_id)))
            .json(data);
        let resp = self.send(request).await?;
        resp.json().await.context("Failed to parse response")
    }

    pub async fn history(
        &self,
        customer_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryMessage>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(customer_id) = customer_id {
            query.push(("customer_id", customer_id.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let request = self.client.get(self.url("/memory/history")).query(&query);
        let resp = self.send(request).await?;
        resp.json().await.context("Failed to parse response")
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.send(self.client.delete(self.url("/memory"))).await?;
        Ok(())
    }
}
