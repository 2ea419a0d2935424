//! Tool registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use murmur_core::tools::Tool;

use crate::traits::MurmurTool;

/// Holds the registered tools, keyed by name.
///
/// `BTreeMap` keeps listings in a stable order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn MurmurTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn MurmurTool>) {
        let _ = self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn MurmurTool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of all registered tools, in name order.
    #[must_use]
    pub fn definitions(&self) -> Vec<Tool> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Names of all registered tools, in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use murmur_core::tools::{text_result, ToolParameterSchema, ToolResult};
    use serde_json::Value;

    use crate::errors::ToolError;
    use crate::traits::ToolContext;

    struct StubTool {
        name: &'static str,
    }

    #[async_trait]
    impl MurmurTool for StubTool {
        fn name(&self) -> &str {
            self.name
        }

        fn definition(&self) -> Tool {
            Tool {
                name: self.name.into(),
                description: "stub".into(),
                parameters: ToolParameterSchema {
                    schema_type: "object".into(),
                    properties: None,
                    required: None,
                    description: None,
                    extra: serde_json::Map::new(),
                },
            }
        }

        async fn execute(
            &self,
            _params: Value,
            _context: &ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(text_result("ok", false))
        }
    }

    #[test]
    fn register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool { name: "b_tool" }));
        registry.register(Arc::new(StubTool { name: "a_tool" }));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("a_tool").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn listings_are_name_ordered() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool { name: "b_tool" }));
        registry.register(Arc::new(StubTool { name: "a_tool" }));

        assert_eq!(registry.names(), vec!["a_tool", "b_tool"]);
        let defs = registry.definitions();
        assert_eq!(defs[0].name, "a_tool");
    }

    #[test]
    fn reregistration_replaces() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool { name: "a_tool" }));
        registry.register(Arc::new(StubTool { name: "a_tool" }));
        assert_eq!(registry.len(), 1);
    }
}
