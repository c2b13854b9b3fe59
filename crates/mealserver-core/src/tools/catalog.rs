//! Category listing tool

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{ToolHandler, json_schema};
use crate::client::{Lookup, MealDbClient};
use crate::format::{RECORD_SEPARATOR, format_category};

/// All meal categories with descriptions
pub struct CategoriesTool {
    client: Arc<MealDbClient>,
}

impl CategoriesTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CategoriesTool {
    fn name(&self) -> &str {
        "get_categories"
    }

    fn description(&self) -> &str {
        "List all meal categories with a thumbnail and description."
    }

    fn input_schema(&self) -> Value {
        json_schema(serde_json::json!({}), vec![])
    }

    async fn execute(&self, _input: Value) -> Result<String> {
        Ok(match self.client.categories().await {
            Lookup::Found(categories) => categories
                .iter()
                .map(format_category)
                .collect::<Vec<_>>()
                .join(RECORD_SEPARATOR),
            Lookup::Empty => "No category found.".to_string(),
            Lookup::Failed(_) => "Unable to fetch any category.".to_string(),
        })
    }
}
