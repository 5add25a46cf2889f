//! CRM Entry Generator - Structured CRM entries from customer interactions

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk::{extract_json_object, DomainError, LlmProvider};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::{ask, invalid_args, pretty_or_none, Tool};

const TEMPERATURE: f32 = 0.2;

const SYSTEM_PROMPT: &str = "You are an expert CRM specialist who creates detailed, structured entries from customer interactions.
Your task is to analyze customer interaction details and generate a comprehensive CRM entry that captures all relevant information.

For each interaction, create a structured CRM entry with the following fields:
1. Customer Name: The name of the customer
2. Interaction Type: The type of interaction (email, call, chat, etc.)
3. Interaction Date: The date of the interaction (extract from context if available)
4. Summary: A brief summary of the interaction
5. Customer Needs: What the customer is looking for or needs
6. Pain Points: Any issues or challenges the customer is facing
7. Action Items: Tasks that need to be completed as a result of this interaction
8. Follow-up Required: Whether follow-up is needed (Yes/No)
9. Follow-up Date: When to follow up (if applicable)
10. Priority: The priority level of this interaction (Low, Medium, High)
11. Sentiment: The customer's sentiment (Positive, Neutral, Negative)
12. Products/Services Discussed: Any products or services mentioned in the interaction
13. Notes: Any additional relevant information

Format your response as a JSON object with these fields. Be comprehensive but concise.
Extract as much information as possible from the provided details, but don't invent information that isn't present.
If a field cannot be determined from the provided information, use \"N/A\" or null as appropriate.
";

/// Customer interaction to turn into a CRM entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CrmEntryInput {
    /// The customer's name
    pub customer_name: String,
    /// Details of the customer interaction
    pub interaction_details: String,
    /// Additional information about the customer or interaction
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub additional_info: Option<Map<String, Value>>,
}

pub struct CrmEntryGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl CrmEntryGenerator {
    pub const NAME: &'static str = "crm_entry_generator";
    pub const DESCRIPTION: &'static str =
        "Generates structured CRM entries from customer interaction details";

    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub async fn generate(&self, input: &CrmEntryInput) -> Value {
        let prompt = format!(
            "Please generate a CRM entry for the following customer interaction:\n\n\
             Customer Name: {}\n\n\
             Interaction Details:\n{}\n\n\
             Additional Information:\n{}\n",
            input.customer_name,
            input.interaction_details,
            pretty_or_none(input.additional_info.as_ref()),
        );

        let content = match ask(self.llm.as_ref(), SYSTEM_PROMPT, prompt, TEMPERATURE).await {
            Ok(content) => content,
            Err(e) => {
                let error_msg = format!("Error generating CRM entry: {}", e);
                tracing::error!("{}", error_msg);
                return json!({
                    "customer_name": input.customer_name,
                    "error": error_msg,
                });
            }
        };

        match extract_json_object(&content) {
            Ok(entry) => {
                tracing::info!(
                    "Successfully generated CRM entry for {}",
                    input.customer_name
                );
                entry
            }
            Err(e) => {
                tracing::error!("Error parsing CRM entry JSON: {}", e);
                json!({
                    "customer_name": input.customer_name,
                    "raw_entry": content,
                    "error": "Failed to parse structured CRM entry",
                })
            }
        }
    }
}

#[async_trait]
impl Tool for CrmEntryGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "customer_name": {"type": "string", "description": "The customer's name"},
                "interaction_details": {"type": "string", "description": "Details of the customer interaction"},
                "additional_info": {"type": "object", "description": "Additional information about the customer or interaction"}
            },
            "required": ["customer_name", "interaction_details"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, DomainError> {
        let input: CrmEntryInput =
            serde_json::from_value(args).map_err(|e| invalid_args(Self::NAME, e))?;
        Ok(self.generate(&input).await)
    }
}
