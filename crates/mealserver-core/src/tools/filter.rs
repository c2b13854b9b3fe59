//! Filter tools: by category, area, and one or more ingredients

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{ToolHandler, json_schema, render_lookup, required_str};
use crate::client::MealDbClient;
use crate::composer::IngredientSearch;
use crate::format::{RECORD_SEPARATOR, format_meal_summary};
use crate::model::MealSummary;

fn render_summaries(summaries: &[MealSummary]) -> String {
    let body = summaries
        .iter()
        .map(format_meal_summary)
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR);
    format!(
        "Found {} meal(s). Use get_meal_by_id for the full recipe.\n\n{}",
        summaries.len(),
        body
    )
}

/// Meals in a category, via `filter.php?c=`
pub struct MealByCategoryTool {
    client: Arc<MealDbClient>,
}

impl MealByCategoryTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MealByCategoryTool {
    fn name(&self) -> &str {
        "get_meal_by_category"
    }

    fn description(&self) -> &str {
        "List meals in a category (names and ids). Use get_categories to see valid categories."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "category": {
                    "type": "string",
                    "description": "Category name (e.g. Seafood)"
                }
            }),
            vec!["category"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let category = required_str(&input, "category")?;
        debug!("Meal filter by category: '{}'", category);

        let lookup = self.client.filter_by_category(category).await;
        Ok(render_lookup(lookup, "category", render_summaries))
    }
}

/// Meals from a cuisine/area, via `filter.php?a=`
pub struct MealByAreaTool {
    client: Arc<MealDbClient>,
}

impl MealByAreaTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MealByAreaTool {
    fn name(&self) -> &str {
        "get_meal_by_area"
    }

    fn description(&self) -> &str {
        "List meals from a cuisine or area (names and ids)."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "area": {
                    "type": "string",
                    "description": "Area or cuisine (e.g. Canadian, Italian)"
                }
            }),
            vec!["area"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let area = required_str(&input, "area")?;
        debug!("Meal filter by area: '{}'", area);

        let lookup = self.client.filter_by_area(area).await;
        Ok(render_lookup(lookup, "area", render_summaries))
    }
}

/// Full recipes containing one ingredient
pub struct MealByIngredientTool {
    search: Arc<IngredientSearch>,
}

impl MealByIngredientTool {
    pub fn new(search: Arc<IngredientSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl ToolHandler for MealByIngredientTool {
    fn name(&self) -> &str {
        "get_meal_by_ingredient"
    }

    fn description(&self) -> &str {
        "Find meals that use an ingredient. Returns full recipes."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "ingredient": {
                    "type": "string",
                    "description": "Main ingredient (e.g. chicken_breast)"
                }
            }),
            vec!["ingredient"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let ingredient = required_str(&input, "ingredient")?.trim();
        let query: Vec<String> = if ingredient.is_empty() {
            vec![]
        } else {
            vec![ingredient.to_string()]
        };
        Ok(self.search.search(&query).await)
    }
}

/// Full recipes containing every listed ingredient
pub struct MealByIngredientsTool {
    search: Arc<IngredientSearch>,
}

impl MealByIngredientsTool {
    pub fn new(search: Arc<IngredientSearch>) -> Self {
        Self { search }
    }
}

/// Accept a JSON array of strings or one comma-separated string.
/// Blank entries are dropped; order is kept.
fn parse_ingredients(input: &Value) -> Result<Vec<String>> {
    let raw = input
        .get("ingredients")
        .ok_or_else(|| anyhow!("Missing 'ingredients' parameter"))?;

    let items: Vec<String> = match raw {
        Value::Array(values) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("'ingredients' must contain only strings"))
            })
            .collect::<Result<_>>()?,
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => bail!("'ingredients' must be an array of strings"),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[async_trait]
impl ToolHandler for MealByIngredientsTool {
    fn name(&self) -> &str {
        "get_meal_by_multiple_ingredients"
    }

    fn description(&self) -> &str {
        "Find meals that contain all of the given ingredients. The first ingredient drives the \
         search, so put the most distinctive one first."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "ingredients": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Ingredients every meal must contain (e.g. [\"chicken\", \"rice\"])"
                }
            }),
            vec!["ingredients"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let ingredients = parse_ingredients(&input)?;
        debug!("Meal search by ingredients: {:?}", ingredients);
        Ok(self.search.search(&ingredients).await)
    }
}
