//! Multi-ingredient meal search
//!
//! TheMealDB only filters by one ingredient at a time, so the intersection
//! is computed here: filter by the first ingredient, fetch every candidate's
//! full record, then keep meals whose ingredient slots mention every other
//! requested ingredient.

use futures_util::StreamExt;
use futures_util::stream;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::{Lookup, MealSource};
use crate::format::format_meals;
use crate::model::Meal;

/// Result of an ingredient search before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was empty; nothing was fetched
    NoIngredients,
    /// The first ingredient produced no candidates
    NoCandidates { ingredient: String },
    /// Candidates existed but none survived detail fetch and matching
    NoMatches { ingredients: Vec<String> },
    /// Matching meals in candidate order
    Matches(Vec<Meal>),
}

impl SearchOutcome {
    /// Caller-facing text for this outcome
    pub fn render(&self) -> String {
        match self {
            SearchOutcome::NoIngredients => "Please provide at least one ingredient.".to_string(),
            SearchOutcome::NoCandidates { ingredient } => {
                format!("No meals found with ingredient: {}", ingredient)
            }
            SearchOutcome::NoMatches { ingredients } => {
                format!("No meals found containing all of: {}", ingredients.join(", "))
            }
            SearchOutcome::Matches(meals) => format_meals(meals),
        }
    }
}

/// Finds meals containing every ingredient of a query
pub struct IngredientSearch {
    source: Arc<dyn MealSource>,
    detail_concurrency: usize,
}

impl IngredientSearch {
    /// Sequential search: one detail fetch at a time
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Self::with_concurrency(source, 1)
    }

    /// Allow up to `detail_concurrency` detail fetches in flight.
    /// Output order stays the candidate order regardless.
    pub fn with_concurrency(source: Arc<dyn MealSource>, detail_concurrency: usize) -> Self {
        Self {
            source,
            detail_concurrency: detail_concurrency.max(1),
        }
    }

    /// Run the search and render the outcome as text
    pub async fn search(&self, ingredients: &[String]) -> String {
        self.find_meals(ingredients).await.render()
    }

    pub async fn find_meals(&self, ingredients: &[String]) -> SearchOutcome {
        let Some(first) = ingredients.first() else {
            return SearchOutcome::NoIngredients;
        };

        let candidates = match self.source.filter_by_ingredient(first).await {
            Lookup::Found(candidates) => candidates,
            Lookup::Empty => {
                debug!(ingredient = %first, "No candidates for first ingredient");
                return SearchOutcome::NoCandidates {
                    ingredient: first.clone(),
                };
            }
            Lookup::Failed(e) => {
                warn!(ingredient = %first, error = %e, "Candidate lookup failed");
                return SearchOutcome::NoCandidates {
                    ingredient: first.clone(),
                };
            }
        };

        let ids: Vec<String> = candidates.into_iter().filter_map(|c| c.id).collect();
        info!(
            ingredient = %first,
            candidates = ids.len(),
            remaining = ingredients.len() - 1,
            "Fetching candidate details"
        );

        let meals = self.fetch_details(&ids).await;

        let remaining = &ingredients[1..];
        let matches: Vec<Meal> = if remaining.is_empty() {
            meals
        } else {
            meals
                .into_iter()
                .filter(|meal| remaining.iter().all(|ingredient| meal.has_ingredient(ingredient)))
                .collect()
        };

        if matches.is_empty() {
            SearchOutcome::NoMatches {
                ingredients: ingredients.to_vec(),
            }
        } else {
            debug!(matches = matches.len(), "Ingredient search complete");
            SearchOutcome::Matches(matches)
        }
    }

    /// Promote candidate ids to full meals, in id order, dropping failures
    async fn fetch_details(&self, ids: &[String]) -> Vec<Meal> {
        let source = Arc::clone(&self.source);
        stream::iter(ids.to_vec())
            .map(move |id| {
                let source = Arc::clone(&source);
                async move {
                    let lookup = source.lookup_meal(&id).await;
                    (id, lookup)
                }
            })
            .buffered(self.detail_concurrency)
            .filter_map(|(id, lookup)| async move {
                match lookup {
                    Lookup::Found(meal) => Some(meal),
                    Lookup::Empty => {
                        debug!(id = %id, "Meal detail empty, skipping");
                        None
                    }
                    Lookup::Failed(e) => {
                        debug!(id = %id, error = %e, "Meal detail unavailable, skipping");
                        None
                    }
                }
            })
            .collect::<Vec<_>>()
            .await
    }
}
