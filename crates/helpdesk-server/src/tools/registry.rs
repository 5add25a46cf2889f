//! Tool Registry - Name to tool dispatch for function calling

use std::collections::HashMap;
use std::sync::Arc;

use helpdesk::{DomainError, ToolSpec};
use serde_json::Value;

use super::Tool;

#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
    order: Vec<&'static str>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        if self.tools.insert(name, tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    /// Function definitions in registration order
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.spec())
            .collect()
    }

    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value, DomainError> {
        let tool = self
            .get(name)
            .ok_or_else(|| DomainError::not_found("Tool", name))?;
        tool.invoke(args).await
    }
}
