//! Core of the mealserver MCP adapter
//!
//! Wraps TheMealDB JSON API in a typed lookup client and builds the
//! tools, resources and prompt templates that the MCP layer exposes.

pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod prompts;
pub mod resources;
pub mod tools;

pub use client::{Lookup, MealDbClient, MealSource};
pub use composer::{IngredientSearch, SearchOutcome};
pub use config::MealDbConfig;
pub use error::LookupError;
pub use model::{Category, Meal, MealSummary};
pub use prompts::PromptLibrary;
pub use resources::CatalogResources;
pub use tools::{ToolExecutor, ToolHandler, ToolRegistry};

use std::sync::Arc;

/// Build a registry holding every meal tool, all sharing one client
pub fn meal_tool_registry(client: Arc<MealDbClient>, detail_concurrency: usize) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    tools::register_meal_tools(&mut registry, client, detail_concurrency);
    registry
}
