//! Meal lookup tools backed by `search.php`, `random.php` and `lookup.php`

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{ToolHandler, json_schema, render_lookup, required_str};
use crate::client::{Lookup, MealDbClient};
use crate::format::{format_meal, format_meals};

/// Search meals by (partial) name
pub struct MealByNameTool {
    client: Arc<MealDbClient>,
}

impl MealByNameTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MealByNameTool {
    fn name(&self) -> &str {
        "get_meal_by_name"
    }

    fn description(&self) -> &str {
        "Search meals by name. Returns full recipes with ingredients and instructions."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "name": {
                    "type": "string",
                    "description": "Meal name or part of it (e.g. Arrabiata, Spicy)"
                }
            }),
            vec!["name"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let name = required_str(&input, "name")?;
        debug!("Meal search by name: '{}'", name);

        let lookup = self.client.search_by_name(name).await;
        Ok(render_lookup(lookup, "name", format_meals))
    }
}

/// List meals whose name starts with a letter
pub struct MealByLetterTool {
    client: Arc<MealDbClient>,
}

impl MealByLetterTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MealByLetterTool {
    fn name(&self) -> &str {
        "get_meal_by_letter"
    }

    fn description(&self) -> &str {
        "List all meals whose name starts with the given letter."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "letter": {
                    "type": "string",
                    "description": "A single letter (e.g. A, B)"
                }
            }),
            vec!["letter"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let letter = required_str(&input, "letter")?.trim();
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphanumeric() => {}
            _ => bail!("'letter' must be a single character, got '{}'", letter),
        }
        debug!("Meal search by first letter: '{}'", letter);

        let lookup = self.client.search_by_first_letter(letter).await;
        Ok(render_lookup(lookup, "letter", format_meals))
    }
}

/// Pick a random meal
pub struct RandomMealTool {
    client: Arc<MealDbClient>,
}

impl RandomMealTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for RandomMealTool {
    fn name(&self) -> &str {
        "get_random_meal"
    }

    fn description(&self) -> &str {
        "Get one random meal with its full recipe."
    }

    fn input_schema(&self) -> Value {
        json_schema(serde_json::json!({}), vec![])
    }

    async fn execute(&self, _input: Value) -> Result<String> {
        Ok(match self.client.random_meal().await {
            Lookup::Found(meals) => format_meals(&meals),
            Lookup::Empty => "No meal found.".to_string(),
            Lookup::Failed(_) => "Unable to fetch any meal.".to_string(),
        })
    }
}

/// Full recipe for a meal id
pub struct MealByIdTool {
    client: Arc<MealDbClient>,
}

impl MealByIdTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MealByIdTool {
    fn name(&self) -> &str {
        "get_meal_by_id"
    }

    fn description(&self) -> &str {
        "Get the full recipe for a meal id, as listed by the category, area and ingredient tools."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "id": {
                    "type": "string",
                    "description": "Meal id (e.g. 52772)"
                }
            }),
            vec!["id"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        // Ids are numeric upstream; accept either JSON form
        let id = match input.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            _ => required_str(&input, "id")?.trim().to_string(),
        };

        Ok(match self.client.lookup_meal(&id).await {
            Lookup::Found(meal) => format_meal(&meal),
            Lookup::Empty => "No meal found for this id.".to_string(),
            Lookup::Failed(_) => "Unable to fetch meals or no meal found for this id.".to_string(),
        })
    }
}
