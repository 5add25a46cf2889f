//! Ticket Router - Categorizes tickets, routes queries, detects support requests

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk::{extract_json_object, parse_support_verdict, DomainError, LlmProvider};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::{ask, invalid_args, pretty_or_none, Tool};

const TEMPERATURE: f32 = 0.1;

const SUPPORT_DETECTION_PROMPT: &str = "You are an expert at identifying support requests in customer communications.
Your task is to determine if an email or message contains a support request that requires a ticket to be created.

A support request typically:
1. Describes a problem, issue, or challenge the customer is facing
2. Asks for help or assistance with a product or service
3. Reports a bug, error, or malfunction
4. Requests a feature or enhancement
5. Expresses dissatisfaction or frustration

Respond with \"Yes\" if the message contains a support request, or \"No\" if it does not.
";

/// Ticket to categorize
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TicketInput {
    /// The ticket title
    pub title: String,
    /// The ticket description
    pub description: String,
    /// The customer ID
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Suggested priority
    #[serde(default)]
    pub priority: Option<String>,
    /// Suggested category
    #[serde(default)]
    pub category: Option<String>,
}

/// Customer query to route
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct QueryInput {
    /// The customer query text
    pub query: String,
    /// The customer ID
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Additional context information
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub context: Option<Map<String, Value>>,
}

/// Departments, priorities and categories the router may choose from
#[derive(Debug, Clone)]
pub struct RoutingVocabulary {
    pub departments: Vec<String>,
    pub priorities: Vec<String>,
    pub categories: Vec<String>,
}

pub struct TicketRouter {
    llm: Arc<dyn LlmProvider>,
    categorization_prompt: String,
    routing_prompt: String,
}

impl TicketRouter {
    pub const NAME: &'static str = "ticket_router";
    pub const DESCRIPTION: &'static str =
        "Categorizes, prioritizes, and routes support tickets and customer queries";

    pub fn new(llm: Arc<dyn LlmProvider>, vocabulary: &RoutingVocabulary) -> Self {
        let categories = vocabulary.categories.join(", ");
        let priorities = vocabulary.priorities.join(", ");
        let departments = vocabulary.departments.join(", ");

        let categorization_prompt = format!(
            "You are an expert support ticket analyst for a customer service team.
Your task is to analyze support tickets and categorize them appropriately.

For each ticket, determine:
1. Category: Select the most appropriate category from: {categories}
2. Priority: Assign a priority level from: {priorities}
3. Department: Route to the appropriate department from: {departments}
4. Estimated Response Time: Provide an estimated time to respond based on the priority
5. Key Issues: Identify the main issues or questions in the ticket (2-3 bullet points)
6. Suggested Approach: Briefly suggest how to handle this ticket

Format your response as a JSON object with these fields. Be objective and consistent in your categorization.
Base your analysis solely on the content of the ticket, not on assumptions.
"
        );

        let routing_prompt = format!(
            "You are an expert customer query router for a customer service team.
Your task is to analyze customer queries and route them to the appropriate department.

For each query, determine:
1. Department: Route to the appropriate department from: {departments}
2. Priority: Assign a priority level from: {priorities}
3. Category: Select the most appropriate category from: {categories}
4. Intent: Identify the primary customer intent or need
5. Key Questions: Extract the main questions or requests
6. Next Steps: Suggest the next steps for handling this query

Format your response as a JSON object with these fields. Be objective and consistent in your routing.
Base your analysis solely on the content of the query, not on assumptions.
"
        );

        Self {
            llm,
            categorization_prompt,
            routing_prompt,
        }
    }

    /// Categorize a ticket into category, priority and department
    pub async fn categorize(&self, ticket: &TicketInput) -> Value {
        let prompt = format!(
            "Please categorize the following support ticket:\n\n\
             Title: {}\n\
             Description: {}\n\
             Customer ID: {}\n\
             Suggested Priority: {}\n\
             Suggested Category: {}\n",
            ticket.title,
            ticket.description,
            ticket.customer_id.as_deref().unwrap_or("N/A"),
            ticket.priority.as_deref().unwrap_or("Not specified"),
            ticket.category.as_deref().unwrap_or("Not specified"),
        );

        let fallback = |extra: Map<String, Value>| {
            let mut result = json!({
                "title": ticket.title,
                "category": ticket.category.as_deref().unwrap_or("Unknown"),
                "priority": ticket.priority.as_deref().unwrap_or("Medium"),
                "department": "Support",
            });
            if let Some(object) = result.as_object_mut() {
                object.extend(extra);
            }
            result
        };

        let content =
            match ask(self.llm.as_ref(), &self.categorization_prompt, prompt, TEMPERATURE).await {
                Ok(content) => content,
                Err(e) => {
                    let error_msg = format!("Error categorizing ticket: {}", e);
                    tracing::error!("{}", error_msg);
                    return fallback(error_fields(None, error_msg));
                }
            };

        match extract_json_object(&content) {
            Ok(result) => {
                tracing::info!("Successfully categorized ticket: {}", ticket.title);
                result
            }
            Err(e) => {
                tracing::error!("Error parsing ticket categorization JSON: {}", e);
                fallback(error_fields(
                    Some(content),
                    "Failed to parse structured categorization".to_string(),
                ))
            }
        }
    }

    /// Route a customer query to a department
    pub async fn route(&self, query: &QueryInput) -> Value {
        let prompt = format!(
            "Please route the following customer query:\n\n\
             Query: {}\n\
             Customer ID: {}\n\
             Additional Context: {}\n",
            query.query,
            query.customer_id.as_deref().unwrap_or("N/A"),
            pretty_or_none(query.context.as_ref()),
        );

        let fallback = |extra: Map<String, Value>| {
            let mut result = json!({
                "department": "Support",
                "priority": "Medium",
                "category": "General",
            });
            if let Some(object) = result.as_object_mut() {
                object.extend(extra);
            }
            result
        };

        let content = match ask(self.llm.as_ref(), &self.routing_prompt, prompt, TEMPERATURE).await
        {
            Ok(content) => content,
            Err(e) => {
                let error_msg = format!("Error routing query: {}", e);
                tracing::error!("{}", error_msg);
                return fallback(error_fields(None, error_msg));
            }
        };

        match extract_json_object(&content) {
            Ok(result) => {
                tracing::info!("Successfully routed customer query");
                result
            }
            Err(e) => {
                tracing::error!("Error parsing query routing JSON: {}", e);
                fallback(error_fields(
                    Some(content),
                    "Failed to parse structured routing".to_string(),
                ))
            }
        }
    }

    /// Whether a message needs a support ticket. Detection failures count as yes.
    pub async fn is_support_request(&self, subject: &str, message: &str) -> bool {
        let prompt = format!(
            "Please determine if the following message contains a support request:\n\n\
             Subject: {}\n\
             Message: {}\n",
            subject, message
        );

        match ask(
            self.llm.as_ref(),
            SUPPORT_DETECTION_PROMPT,
            prompt,
            TEMPERATURE,
        )
        .await
        {
            Ok(content) => {
                let is_support = parse_support_verdict(&content);
                tracing::info!(
                    "Support request detection: {} for subject: {}",
                    is_support,
                    subject
                );
                is_support
            }
            Err(e) => {
                tracing::error!("Error detecting support request: {}", e);
                true
            }
        }
    }
}

fn error_fields(raw_response: Option<String>, error: String) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Some(raw) = raw_response {
        fields.insert("raw_response".to_string(), Value::String(raw));
    }
    fields.insert("error".to_string(), Value::String(error));
    fields
}

#[async_trait]
impl Tool for TicketRouter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "description": "Pass `query` to route a customer query, or `title` and `description` to categorize a ticket.",
            "properties": {
                "query": {"type": "string", "description": "The customer query text"},
                "title": {"type": "string", "description": "The ticket title"},
                "description": {"type": "string", "description": "The ticket description"},
                "customer_id": {"type": "string", "description": "The customer ID"},
                "priority": {"type": "string", "description": "Suggested priority"},
                "category": {"type": "string", "description": "Suggested category"},
                "context": {"type": "object", "description": "Additional context information"}
            }
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, DomainError> {
        if args.get("query").is_some() {
            let input: QueryInput =
                serde_json::from_value(args).map_err(|e| invalid_args(Self::NAME, e))?;
            return Ok(self.route(&input).await);
        }
        let input: TicketInput =
            serde_json::from_value(args).map_err(|e| invalid_args(Self::NAME, e))?;
        Ok(self.categorize(&input).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::ScriptedLlm;

    fn vocabulary() -> RoutingVocabulary {
        RoutingVocabulary {
            departments: vec!["Sales".into(), "Support".into(), "Billing".into()],
            priorities: vec!["Low".into(), "Medium".into(), "High".into()],
            categories: vec!["Billing".into(), "Technical".into()],
        }
    }

    fn router(llm: Arc<ScriptedLlm>) -> TicketRouter {
        TicketRouter::new(llm, &vocabulary())
    }

    fn ticket() -> TicketInput {
        TicketInput {
            title: "Cannot login".to_string(),
            description: "Invalid credentials after reset".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_categorize_parses_fenced_json() {
        let llm = Arc::new(ScriptedLlm::text(
            "Here you go:\n```json\n{\"category\": \"Technical\", \"priority\": \"High\", \"department\": \"Support\"}\n```",
        ));
        let result = router(llm.clone()).categorize(&ticket()).await;

        assert_eq!(result["category"], "Technical");
        assert_eq!(result["priority"], "High");
        let prompt = llm.last_prompt();
        assert!(prompt.contains("Customer ID: N/A"));
        assert!(prompt.contains("Suggested Priority: Not specified"));
        assert!(prompt.contains("Suggested Category: Not specified"));

        let requests = llm.requests.lock().unwrap();
        let system = &requests[0].0[0].content;
        assert!(system.contains("Select the most appropriate category from: Billing, Technical"));
        assert!(system.contains("department from: Sales, Support, Billing"));
    }

    #[tokio::test]
    async fn test_categorize_parse_failure_keeps_raw_response() {
        let llm = Arc::new(ScriptedLlm::text("It is probably technical."));
        let input = TicketInput {
            priority: Some("High".to_string()),
            ..ticket()
        };
        let result = router(llm).categorize(&input).await;

        assert_eq!(
            result,
            json!({
                "title": "Cannot login",
                "category": "Unknown",
                "priority": "High",
                "department": "Support",
                "raw_response": "It is probably technical.",
                "error": "Failed to parse structured categorization"
            })
        );
    }

    #[tokio::test]
    async fn test_categorize_llm_failure() {
        let llm = Arc::new(ScriptedLlm::failing("rate limited"));
        let result = router(llm).categorize(&ticket()).await;

        assert_eq!(result["category"], "Unknown");
        assert_eq!(result["priority"], "Medium");
        assert!(result.get("raw_response").is_none());
        assert_eq!(
            result["error"],
            "Error categorizing ticket: LLM error: rate limited"
        );
    }

    #[tokio::test]
    async fn test_route_renders_context() {
        let llm = Arc::new(ScriptedLlm::text("{\"department\": \"Billing\"}"));
        let context = json!({"plan": "Enterprise"});
        let query = QueryInput {
            query: "Why was I charged twice?".to_string(),
            customer_id: Some("CUST67890".to_string()),
            context: context.as_object().cloned(),
        };
        let result = router(llm.clone()).route(&query).await;

        assert_eq!(result["department"], "Billing");
        let prompt = llm.last_prompt();
        assert!(prompt.contains("Customer ID: CUST67890"));
        assert!(prompt.contains("\"plan\": \"Enterprise\""));
    }

    #[tokio::test]
    async fn test_route_fallbacks() {
        let unparsable = router(Arc::new(ScriptedLlm::text("Billing, I think")))
            .route(&QueryInput {
                query: "refund".to_string(),
                ..Default::default()
            })
            .await;
        assert_eq!(unparsable["department"], "Support");
        assert_eq!(unparsable["category"], "General");
        assert_eq!(unparsable["raw_response"], "Billing, I think");
        assert_eq!(unparsable["error"], "Failed to parse structured routing");

        let llm = Arc::new(ScriptedLlm::failing("down"));
        let failed = router(llm.clone())
            .route(&QueryInput {
                query: "refund".to_string(),
                ..Default::default()
            })
            .await;
        assert_eq!(failed["error"], "Error routing query: LLM error: down");
        assert!(llm.last_prompt().contains("Additional Context: None"));
    }

    #[tokio::test]
    async fn test_support_detection() {
        let yes = router(Arc::new(ScriptedLlm::text("Yes.")));
        assert!(yes.is_support_request("Login", "I can't log in").await);

        let no = router(Arc::new(ScriptedLlm::text("No, this is a thank-you note")));
        assert!(!no.is_support_request("Thanks", "Great demo!").await);

        let failing = router(Arc::new(ScriptedLlm::failing("down")));
        assert!(failing.is_support_request("?", "?").await);
    }

    #[tokio::test]
    async fn test_invoke_dispatches_on_arguments() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            crate::tools::testing::Reply::Text("{\"department\": \"Sales\"}".into()),
            crate::tools::testing::Reply::Text("{\"category\": \"Billing\"}".into()),
        ]));
        let router = router(llm);

        let routed = router.invoke(json!({"query": "pricing?"})).await.unwrap();
        assert_eq!(routed["department"], "Sales");

        let categorized = router
            .invoke(json!({"title": "Invoice", "description": "Wrong amount"}))
            .await
            .unwrap();
        assert_eq!(categorized["category"], "Billing");

        assert!(router.invoke(json!({"title": "only title"})).await.is_err());
    }
}
