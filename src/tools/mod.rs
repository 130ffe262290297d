//! Tool trait and registry
//!
//! Tools are stateless request/response handlers that call out to
//! external providers and reformat results as plain key/value structures.

use crate::models::ToolDescriptor;
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub mod equity;
pub mod intel;

pub use equity::EquityAnalyzerTool;
pub use intel::MarketIntelligenceTool;

/// Trait for a single tool invocable over the /call_tool contract
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;

    /// Run the tool on its single free-text input.
    async fn execute(&self, input: &str) -> Result<Value>;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Descriptors in registration order, as served by GET /tools.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.descriptor())
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the default registry with the two finance tools.
pub fn create_default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(EquityAnalyzerTool::new()));
    registry.register(Arc::new(MarketIntelligenceTool::new()));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_two_tools() {
        let registry = create_default_registry();

        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "equity_analyzer");
        assert_eq!(descriptors[1].name, "market_intelligence");
    }

    #[test]
    fn test_lookup_unknown_tool() {
        let registry = create_default_registry();
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_descriptor_schemas_are_objects() {
        let registry = create_default_registry();

        for descriptor in registry.descriptors() {
            assert_eq!(descriptor.input_schema["type"], "object");
            assert!(descriptor.input_schema["properties"]["input"].is_object());
        }
    }
}
