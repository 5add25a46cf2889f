//! Customer Service Agent (Use Cases)
//!
//! Owns the tools, the connectors and the memory. Direct operations
//! delegate to a single tool; `chat` runs a function-calling loop over
//! all of them; `process_email_batch` drives the mailbox end to end.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use helpdesk::{
    ChatMessage, CompletionOptions, CrmConnector, DomainError, Email, EmailConnector,
    LlmProvider, MessageKind, TicketConnector, TicketDraft, ToolCall,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::memory::{AgentMemory, DEFAULT_HISTORY_LIMIT};
use crate::tools::{
    field_str, CrmEntryGenerator, CrmEntryInput, EmailInput, EmailSummarizer, KnowledgeTool,
    QueryInput, RoutingVocabulary, TicketInput, TicketRouter, ToolRegistry,
};

const SYSTEM_PROMPT: &str = "You are a professional customer service AI assistant.
Your job is to help with various customer service tasks including:
1. Summarizing emails into concise, actionable points
2. Categorizing and prioritizing support tickets
3. Creating detailed CRM entries from customer interactions
4. Routing customer queries to the appropriate department

Always be professional, accurate, and helpful. When summarizing or categorizing,
focus on extracting the key information and intent. When creating CRM entries,
be comprehensive but concise.
";

pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit.";

/// Agent tuning knobs
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub temperature: f32,
    pub max_iterations: usize,
    /// Log tool dispatch at info instead of debug
    pub verbose: bool,
    pub email_batch_size: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_iterations: 10,
            verbose: false,
            email_batch_size: 10,
        }
    }
}

/// External systems the agent acts on
#[derive(Clone)]
pub struct Connectors {
    pub email: Arc<dyn EmailConnector>,
    pub crm: Arc<dyn CrmConnector>,
    pub tickets: Arc<dyn TicketConnector>,
}

/// Final answer of a chat turn
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatReply {
    pub output: String,
    /// Tool names in call order
    pub tools_used: Vec<String>,
}

/// An email the batch could not finish
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchFailure {
    pub email_id: String,
    pub error: String,
}

/// Outcome of one email batch run
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub fetched: usize,
    pub processed: usize,
    pub tickets_created: usize,
    pub crm_entries_created: usize,
    pub failures: Vec<BatchFailure>,
}

pub struct CustomerServiceAgent {
    llm: Arc<dyn LlmProvider>,
    summarizer: Arc<EmailSummarizer>,
    router: Arc<TicketRouter>,
    crm_generator: Arc<CrmEntryGenerator>,
    knowledge: Arc<KnowledgeTool>,
    registry: ToolRegistry,
    connectors: Connectors,
    memory: Arc<AgentMemory>,
    config: AgentConfig,
}

impl CustomerServiceAgent {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        knowledge: KnowledgeTool,
        vocabulary: &RoutingVocabulary,
        connectors: Connectors,
        memory: Arc<AgentMemory>,
        config: AgentConfig,
    ) -> Self {
        let summarizer = Arc::new(EmailSummarizer::new(llm.clone()));
        let router = Arc::new(TicketRouter::new(llm.clone(), vocabulary));
        let crm_generator = Arc::new(CrmEntryGenerator::new(llm.clone()));
        let knowledge = Arc::new(knowledge);

        let registry = ToolRegistry::new()
            .with(summarizer.clone())
            .with(crm_generator.clone())
            .with(router.clone())
            .with(knowledge.clone());

        tracing::info!(
            "🤖 Customer Service Agent initialized ({} tools, model {})",
            registry.names().len(),
            llm.model_id()
        );

        Self {
            llm,
            summarizer,
            router,
            crm_generator,
            knowledge,
            registry,
            connectors,
            memory,
            config,
        }
    }

    pub fn memory(&self) -> &Arc<AgentMemory> {
        &self.memory
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeTool> {
        &self.knowledge
    }

    pub fn connectors(&self) -> &Connectors {
        &self.connectors
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    pub async fn summarize_email(&self, email: &EmailInput) -> String {
        tracing::info!(
            "Summarizing email from {} with subject: {}",
            email.sender,
            email.subject
        );
        self.summarizer.summarize(email).await
    }

    pub async fn categorize_ticket(&self, ticket: &TicketInput) -> Value {
        tracing::info!("Categorizing ticket: {}", ticket.title);
        let result = self.router.categorize(ticket).await;
        tracing::info!(
            "Ticket categorized as {} with {} priority",
            field_str(&result, "category").unwrap_or("Unknown"),
            field_str(&result, "priority").unwrap_or("Unknown")
        );
        result
    }

    pub async fn create_crm_entry(&self, input: &CrmEntryInput) -> Value {
        tracing::info!("Creating CRM entry for customer: {}", input.customer_name);
        self.crm_generator.generate(input).await
    }

    /// Route a query, folding in what we remember about the customer
    pub async fn route_query(&self, query: &QueryInput) -> Value {
        tracing::info!(
            "Routing customer query: {}...",
            query.query.chars().take(50).collect::<String>()
        );

        let mut input = query.clone();
        if let Some(customer_id) = query.customer_id.as_deref() {
            let stored = self.memory.customer_context(customer_id).await;
            if !stored.is_empty() {
                input
                    .context
                    .get_or_insert_with(Map::new)
                    .insert("customer_context".to_string(), Value::Object(stored));
            }
        }

        let routing = self.router.route(&input).await;
        tracing::info!(
            "Query routed to {}",
            field_str(&routing, "department").unwrap_or("Unknown")
        );

        self.memory
            .save_context(&query.query, &routing.to_string(), query.customer_id.as_deref())
            .await;
        routing
    }

    /// One chat turn with function calling over every tool
    pub async fn chat(
        &self,
        message: &str,
        customer_id: Option<&str>,
    ) -> Result<ChatReply, DomainError> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        for remembered in self
            .memory
            .relevant_history(customer_id, DEFAULT_HISTORY_LIMIT)
            .await
        {
            messages.push(match remembered.kind {
                MessageKind::Human => ChatMessage::user(remembered.content),
                MessageKind::Ai => ChatMessage::assistant(remembered.content),
                MessageKind::System => ChatMessage::system(remembered.content),
            });
        }
        messages.push(ChatMessage::user(message));

        let specs = self.registry.specs();
        let options = CompletionOptions::with_temperature(self.config.temperature);
        let mut tools_used = Vec::new();
        let mut output = None;

        for _ in 0..self.config.max_iterations {
            let response = self
                .llm
                .complete_with_tools(&messages, &specs, &options)
                .await?;

            if response.tool_calls.is_empty() {
                output = Some(response.content);
                break;
            }

            messages.push(ChatMessage::assistant_with_tools(
                response.content,
                response.tool_calls.clone(),
            ));
            for call in response.tool_calls {
                let result = self.run_tool(&call).await;
                tools_used.push(call.name.clone());
                messages.push(ChatMessage::tool(call.id, result));
            }
        }

        let output = output.unwrap_or_else(|| {
            tracing::warn!(
                "⚠️  Agent hit the iteration limit ({})",
                self.config.max_iterations
            );
            ITERATION_LIMIT_MESSAGE.to_string()
        });

        self.memory.save_context(message, &output, customer_id).await;
        Ok(ChatReply { output, tools_used })
    }

    /// Run a model-requested tool; failures become the tool's answer
    async fn run_tool(&self, call: &ToolCall) -> String {
        if self.config.verbose {
            tracing::info!("🔧 Tool call {}: {}", call.name, call.arguments);
        } else {
            tracing::debug!("🔧 Tool call {}: {}", call.name, call.arguments);
        }

        let args: Value = if call.arguments.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(&call.arguments) {
                Ok(args) => args,
                Err(e) => return format!("Error: invalid arguments for {}: {}", call.name, e),
            }
        };

        match self.registry.dispatch(&call.name, args).await {
            Ok(Value::String(text)) => text,
            Ok(value) => value.to_string(),
            Err(e) => {
                tracing::warn!("⚠️  Tool {} failed: {}", call.name, e);
                format!("Error: {}", e)
            }
        }
    }

    /// Fetch unprocessed emails and work through each of them
    pub async fn process_email_batch(&self) -> Result<BatchReport, DomainError> {
        tracing::info!("📬 Starting batch email processing");
        let started_at = Utc::now();

        let emails = self
            .connectors
            .email
            .fetch_unprocessed(self.config.email_batch_size)
            .await?;

        let mut report = BatchReport {
            started_at,
            finished_at: started_at,
            fetched: emails.len(),
            processed: 0,
            tickets_created: 0,
            crm_entries_created: 0,
            failures: Vec::new(),
        };

        for email in &emails {
            match self.process_email(email, &mut report).await {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    tracing::error!("Error processing email {}: {}", email.id, e);
                    report.failures.push(BatchFailure {
                        email_id: email.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.finished_at = Utc::now();
        tracing::info!(
            "✅ Batch email processing completed. Processed {}/{} emails ({} tickets, {} CRM entries)",
            report.processed,
            report.fetched,
            report.tickets_created,
            report.crm_entries_created
        );
        Ok(report)
    }

    async fn process_email(
        &self,
        email: &Email,
        report: &mut BatchReport,
    ) -> Result<(), DomainError> {
        let summary = self
            .summarize_email(&EmailInput {
                subject: email.subject.clone(),
                body: email.body.clone(),
                sender: email.sender.clone(),
                date: email.date.clone(),
                attachments: Some(email.attachments.clone()),
            })
            .await;

        if self
            .router
            .is_support_request(&email.subject, &email.body)
            .await
        {
            let categorization = self
                .categorize_ticket(&TicketInput {
                    title: email.subject.clone(),
                    description: email.body.clone(),
                    customer_id: email.customer_id.clone(),
                    ..Default::default()
                })
                .await;

            let ticket_id = self
                .connectors
                .tickets
                .create_ticket(TicketDraft {
                    title: email.subject.clone(),
                    description: email.body.clone(),
                    category: field_str(&categorization, "category")
                        .unwrap_or("Unknown")
                        .to_string(),
                    priority: field_str(&categorization, "priority")
                        .unwrap_or("Medium")
                        .to_string(),
                    customer_id: email.customer_id.clone(),
                    ..Default::default()
                })
                .await?;
            tracing::info!("🎫 Ticket {} created from email {}", ticket_id, email.id);
            report.tickets_created += 1;
        }

        let mut additional_info = Map::new();
        additional_info.insert("email_id".to_string(), Value::String(email.id.clone()));
        let entry = self
            .create_crm_entry(&CrmEntryInput {
                customer_name: email.sender.clone(),
                interaction_details: format!("Email: {}\n\nSummary: {}", email.subject, summary),
                additional_info: Some(additional_info),
            })
            .await;

        self.connectors.crm.create_entry(entry).await?;
        report.crm_entries_created += 1;

        self.connectors.email.mark_processed(&email.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        JsonFileMemoryStore, SimulatedCrm, SimulatedMailbox, SimulatedTicketDesk,
    };
    use crate::tools::testing::{Reply, ScriptedLlm};
    use async_trait::async_trait;
    use helpdesk::{
        CrmProvider, Customer, EmailProvider, EmbeddingService, Interaction, TicketFilter,
        TicketProvider,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoEmbeddings;

    #[async_trait]
    impl EmbeddingService for NoEmbeddings {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
            Ok(vec![1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
            Ok(texts.iter().map(|_| vec![1.0]).collect())
        }
    }

    /// Delegates to the simulated CRM but rejects the n-th entry
    struct FlakyCrm {
        inner: Arc<SimulatedCrm>,
        fail_on: usize,
        entries_seen: AtomicUsize,
    }

    #[async_trait]
    impl CrmConnector for FlakyCrm {
        async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, DomainError> {
            self.inner.get_customer(customer_id).await
        }

        async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, DomainError> {
            self.inner.search_customers(query).await
        }

        async fn create_entry(&self, entry: Value) -> Result<String, DomainError> {
            let call = self.entries_seen.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_on {
                return Err(DomainError::ExternalService("CRM unavailable".to_string()));
            }
            self.inner.create_entry(entry).await
        }

        async fn update_customer(
            &self,
            customer_id: &str,
            fields: Map<String, Value>,
        ) -> Result<bool, DomainError> {
            self.inner.update_customer(customer_id, fields).await
        }

        async fn create_customer(&self, fields: Map<String, Value>) -> Result<String, DomainError> {
            self.inner.create_customer(fields).await
        }

        async fn recent_interactions(
            &self,
            customer_id: &str,
            limit: usize,
        ) -> Result<Vec<Interaction>, DomainError> {
            self.inner.recent_interactions(customer_id, limit).await
        }

        fn provider(&self) -> &CrmProvider {
            self.inner.provider()
        }
    }

    struct Fixture {
        agent: CustomerServiceAgent,
        llm: Arc<ScriptedLlm>,
        mailbox: Arc<SimulatedMailbox>,
        crm: Arc<SimulatedCrm>,
        desk: Arc<SimulatedTicketDesk>,
        _dir: tempfile::TempDir,
    }

    async fn fixture(replies: Vec<Reply>, config: AgentConfig) -> Fixture {
        fixture_with_crm(replies, config, |crm| crm as Arc<dyn CrmConnector>).await
    }

    async fn fixture_with_crm(
        replies: Vec<Reply>,
        config: AgentConfig,
        wrap_crm: impl FnOnce(Arc<SimulatedCrm>) -> Arc<dyn CrmConnector>,
    ) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let llm = Arc::new(ScriptedLlm::new(replies));
        let mailbox = Arc::new(SimulatedMailbox::new(EmailProvider::Gmail));
        let crm = Arc::new(SimulatedCrm::new(CrmProvider::Salesforce));
        let desk = Arc::new(SimulatedTicketDesk::new(TicketProvider::Zendesk));
        let memory = Arc::new(
            AgentMemory::load(Arc::new(JsonFileMemoryStore::new(
                dir.path().join("memory.json"),
            )))
            .await,
        );
        let knowledge = KnowledgeTool::new(llm.clone(), Arc::new(NoEmbeddings), None, false);
        let vocabulary = RoutingVocabulary {
            departments: vec!["Support".into(), "Billing".into()],
            priorities: vec!["Low".into(), "Medium".into(), "High".into()],
            categories: vec!["Technical".into(), "Billing".into()],
        };
        let agent = CustomerServiceAgent::new(
            llm.clone(),
            knowledge,
            &vocabulary,
            Connectors {
                email: mailbox.clone(),
                crm: wrap_crm(crm.clone()),
                tickets: desk.clone(),
            },
            memory,
            config,
        );
        Fixture {
            agent,
            llm,
            mailbox,
            crm,
            desk,
            _dir: dir,
        }
    }

    fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    #[tokio::test]
    async fn test_chat_without_tools() {
        let f = fixture(
            vec![Reply::Text("Happy to help!".into())],
            AgentConfig::default(),
        )
        .await;

        let reply = f.agent.chat("Hello", Some("CUST12345")).await.unwrap();
        assert_eq!(reply.output, "Happy to help!");
        assert!(reply.tools_used.is_empty());

        let history = f.agent.memory().history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "Hello");
        assert_eq!(history[1].customer_id.as_deref(), Some("CUST12345"));
    }

    #[tokio::test]
    async fn test_chat_dispatches_tools_and_reports_errors() {
        let f = fixture(
            vec![
                Reply::Calls(vec![
                    call("call_1", "ticket_router", r#"{"query": "refund please"}"#),
                    call("call_2", "weather", "{}"),
                    call("call_3", "crm_entry_generator", "{not json"),
                ]),
                Reply::Text("{\"department\": \"Billing\"}".into()),
                Reply::Text("Routed to Billing.".into()),
            ],
            AgentConfig::default(),
        )
        .await;

        let reply = f.agent.chat("I want a refund", None).await.unwrap();
        assert_eq!(reply.output, "Routed to Billing.");
        assert_eq!(
            reply.tools_used,
            vec!["ticket_router", "weather", "crm_entry_generator"]
        );

        let requests = f.llm.requests.lock().unwrap();
        let last = &requests.last().unwrap().0;
        let tool_results: Vec<&ChatMessage> = last
            .iter()
            .filter(|m| m.tool_call_id.is_some())
            .collect();
        assert_eq!(tool_results.len(), 3);
        assert!(tool_results[0].content.contains("Billing"));
        assert!(tool_results[1].content.starts_with("Error: "));
        assert!(tool_results[2]
            .content
            .starts_with("Error: invalid arguments for crm_entry_generator"));
    }

    #[tokio::test]
    async fn test_chat_iteration_limit() {
        let looping = (0..3)
            .map(|i| Reply::Calls(vec![call(&format!("c{}", i), "rag_tool", r#"{"query": "x"}"#)]))
            .collect();
        let f = fixture(
            looping,
            AgentConfig {
                max_iterations: 2,
                ..Default::default()
            },
        )
        .await;

        let reply = f.agent.chat("loop", None).await.unwrap();
        assert_eq!(reply.output, ITERATION_LIMIT_MESSAGE);
        assert_eq!(reply.tools_used, vec!["rag_tool", "rag_tool"]);
    }

    #[tokio::test]
    async fn test_chat_propagates_llm_failure() {
        let f = fixture(vec![Reply::Fail("down".into())], AgentConfig::default()).await;
        assert!(matches!(
            f.agent.chat("hi", None).await,
            Err(DomainError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn test_route_query_uses_customer_context() {
        let f = fixture(
            vec![Reply::Text("{\"department\": \"Billing\"}".into())],
            AgentConfig::default(),
        )
        .await;
        let stored = json!({"plan": "Enterprise"}).as_object().cloned().unwrap();
        f.agent
            .memory()
            .update_customer_context("CUST67890", stored)
            .await;

        let routing = f
            .agent
            .route_query(&QueryInput {
                query: "Double charge".to_string(),
                customer_id: Some("CUST67890".to_string()),
                context: None,
            })
            .await;

        assert_eq!(routing["department"], "Billing");
        let prompt = f.llm.last_prompt();
        assert!(prompt.contains("\"customer_context\""));
        assert!(prompt.contains("\"plan\": \"Enterprise\""));

        let history = f
            .agent
            .memory()
            .relevant_history(Some("CUST67890"), 10)
            .await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "Double charge");
    }

    #[tokio::test]
    async fn test_process_email_batch() {
        // Per email: summary, support verdict, [categorization], CRM entry
        let mut replies = Vec::new();
        for i in 0..2 {
            replies.push(Reply::Text(format!("summary {}", i)));
            replies.push(Reply::Text("Yes".into()));
            replies.push(Reply::Text(
                "{\"category\": \"Technical\", \"priority\": \"High\"}".into(),
            ));
            replies.push(Reply::Text("{\"Priority\": \"High\"}".into()));
        }
        replies.push(Reply::Text("summary 2".into()));
        replies.push(Reply::Text("No".into()));
        replies.push(Reply::Text("not json".into()));

        let f = fixture(
            replies,
            AgentConfig {
                email_batch_size: 3,
                ..Default::default()
            },
        )
        .await;

        let report = f.agent.process_email_batch().await.unwrap();
        assert_eq!(report.fetched, 3);
        assert_eq!(report.processed, 3);
        assert_eq!(report.tickets_created, 2);
        assert_eq!(report.crm_entries_created, 3);
        assert!(report.failures.is_empty());

        let remaining = f.mailbox.fetch_unprocessed(10).await.unwrap();
        assert_eq!(remaining.len(), 2);

        let entries = f.crm.entries().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[2].entry["error"],
            "Failed to parse structured CRM entry"
        );

        let created = f
            .desk
            .search_tickets(
                "",
                TicketFilter {
                    priority: Some("High".to_string()),
                    limit: 20,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // one seeded high-priority ticket plus the two from the batch
        assert_eq!(created.len(), 3);
    }

    #[tokio::test]
    async fn test_process_email_batch_continues_after_failure() {
        // Unscripted turns answer "No": no tickets, degraded CRM entries
        let f = fixture_with_crm(Vec::new(), AgentConfig::default(), |crm| {
            Arc::new(FlakyCrm {
                inner: crm,
                fail_on: 2,
                entries_seen: AtomicUsize::new(0),
            }) as Arc<dyn CrmConnector>
        })
        .await;
        let inbox = f.mailbox.fetch_unprocessed(10).await.unwrap();
        assert_eq!(inbox.len(), 5);

        let report = f.agent.process_email_batch().await.unwrap();
        assert_eq!(report.fetched, 5);
        assert_eq!(report.processed, 4);
        assert_eq!(report.crm_entries_created, 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].email_id, inbox[1].id);
        assert!(report.failures[0].error.contains("CRM unavailable"));

        let remaining = f.mailbox.fetch_unprocessed(10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, inbox[1].id);
        assert_eq!(f.crm.entries().await.len(), 4);
    }
}
