//! Tool registry and executor system

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{Lookup, MealDbClient};
use crate::composer::IngredientSearch;

pub mod catalog;
pub mod filter;
pub mod search;

/// Name, description and input schema of a tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Trait for executing tools
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, tool_name: &str, input: Value) -> Result<String>;
    fn list_tools(&self) -> Vec<ToolDefinition>;
}

/// Individual tool handler
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<String>;
}

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<Arc<str>, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool handler
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name: Arc<str> = Arc::from(handler.name());
        debug!("Registering tool: {}", name);
        self.tools.insert(name, handler);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name as &str).cloned()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(&self, tool_name: &str, input: Value) -> Result<String> {
        debug!("Executing tool: {} with input: {:?}", tool_name, input);

        let handler = self
            .tools
            .get(tool_name)
            .ok_or_else(|| anyhow!("Unknown tool: {}", tool_name))?;

        match handler.execute(input).await {
            Ok(result) => {
                debug!("Tool {} succeeded", tool_name);
                Ok(result)
            }
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                Err(e)
            }
        }
    }

    /// Definitions sorted by name so listings are stable
    fn list_tools(&self) -> Vec<ToolDefinition> {
        let mut tools: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|handler| ToolDefinition {
                name: handler.name().to_string(),
                description: handler.description().to_string(),
                input_schema: handler.input_schema(),
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }
}

/// Register every meal tool against a shared client
pub fn register_meal_tools(
    registry: &mut ToolRegistry,
    client: Arc<MealDbClient>,
    detail_concurrency: usize,
) {
    let ingredient_search = Arc::new(IngredientSearch::with_concurrency(
        client.clone(),
        detail_concurrency,
    ));

    registry.register(Arc::new(search::MealByNameTool::new(client.clone())));
    registry.register(Arc::new(search::MealByLetterTool::new(client.clone())));
    registry.register(Arc::new(search::RandomMealTool::new(client.clone())));
    registry.register(Arc::new(search::MealByIdTool::new(client.clone())));
    registry.register(Arc::new(catalog::CategoriesTool::new(client.clone())));
    registry.register(Arc::new(filter::MealByCategoryTool::new(client.clone())));
    registry.register(Arc::new(filter::MealByAreaTool::new(client)));
    registry.register(Arc::new(filter::MealByIngredientTool::new(
        ingredient_search.clone(),
    )));
    registry.register(Arc::new(filter::MealByIngredientsTool::new(
        ingredient_search,
    )));
}

/// Helper function to create a JSON schema for tool input
pub fn json_schema(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Read a required string argument
pub(crate) fn required_str<'a>(input: &'a Value, key: &str) -> Result<&'a str> {
    input
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("Missing '{}' parameter", key))
}

/// Render a list lookup with the two "nothing" messages tools share.
/// `noun` completes "...no meal found for this <noun>."
pub(crate) fn render_lookup<T>(
    lookup: Lookup<Vec<T>>,
    noun: &str,
    render: impl Fn(&[T]) -> String,
) -> String {
    match lookup {
        Lookup::Found(items) => render(&items),
        Lookup::Empty => format!("No meal found for this {}.", noun),
        Lookup::Failed(_) => format!("Unable to fetch meals or no meal found for this {}.", noun),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyTool;

    #[async_trait]
    impl ToolHandler for DummyTool {
        fn name(&self) -> &str {
            "dummy"
        }

        fn description(&self) -> &str {
            "A dummy tool for testing"
        }

        fn input_schema(&self) -> Value {
            json_schema(
                serde_json::json!({
                    "message": {
                        "type": "string",
                        "description": "Test message"
                    }
                }),
                vec!["message"],
            )
        }

        async fn execute(&self, _input: Value) -> Result<String> {
            Ok("dummy result".to_string())
        }
    }

    struct FailingTool;

    #[async_trait]
    impl ToolHandler for FailingTool {
        fn name(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn input_schema(&self) -> Value {
            json_schema(serde_json::json!({}), vec![])
        }
        async fn execute(&self, _input: Value) -> Result<String> {
            Err(anyhow!("intentional failure"))
        }
    }

    #[tokio::test]
    async fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(DummyTool));

        assert_eq!(registry.len(), 1);

        let result = registry
            .execute("dummy", serde_json::json!({"message": "test"}))
            .await;
        assert_eq!(result.unwrap(), "dummy result");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry.execute("nonexistent", serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_registry_execute_failing_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingTool));

        let result = registry.execute("failing", serde_json::json!({})).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("intentional failure")
        );
    }

    #[test]
    fn test_registry_list_tools_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingTool));
        registry.register(Arc::new(DummyTool));

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "dummy");
        assert_eq!(tools[1].name, "failing");
        assert!(tools[0].input_schema.get("properties").is_some());
    }

    #[test]
    fn test_registry_overwrite() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(DummyTool));
        registry.register(Arc::new(DummyTool));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("dummy").is_some());
    }

    #[test]
    fn test_meal_tools_registered() {
        let client = Arc::new(MealDbClient::new(&Default::default()).unwrap());
        let mut registry = ToolRegistry::default();
        register_meal_tools(&mut registry, client, 1);

        let names: Vec<String> = registry.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "get_categories",
                "get_meal_by_area",
                "get_meal_by_category",
                "get_meal_by_id",
                "get_meal_by_ingredient",
                "get_meal_by_letter",
                "get_meal_by_multiple_ingredients",
                "get_meal_by_name",
                "get_random_meal",
            ]
        );
    }

    #[test]
    fn test_json_schema_helper() {
        let schema = json_schema(
            serde_json::json!({
                "name": {"type": "string"}
            }),
            vec!["name"],
        );
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"][0], "name");
    }

    #[test]
    fn test_required_str() {
        let input = serde_json::json!({"name": "Arrabiata", "count": 3});
        assert_eq!(required_str(&input, "name").unwrap(), "Arrabiata");
        assert!(required_str(&input, "count").is_err());
        assert!(
            required_str(&input, "missing")
                .unwrap_err()
                .to_string()
                .contains("'missing'")
        );
    }

    #[test]
    fn test_render_lookup_messages() {
        let render = |items: &[u8]| format!("{} items", items.len());
        assert_eq!(render_lookup(Lookup::Found(vec![1, 2]), "name", render), "2 items");
        assert_eq!(
            render_lookup(Lookup::<Vec<u8>>::Empty, "name", render),
            "No meal found for this name."
        );
        assert_eq!(
            render_lookup(
                Lookup::<Vec<u8>>::Failed(crate::error::LookupError::Timeout),
                "area",
                render
            ),
            "Unable to fetch meals or no meal found for this area."
        );
    }
}
