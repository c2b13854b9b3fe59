//! TheMealDB records as delivered by the JSON API
//!
//! Every text field is optional upstream and may arrive as `null`, an empty
//! string or whitespace. All of those become `None` here so the formatter
//! only has one notion of "missing".

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Number of (ingredient, measure) slots a meal record carries
pub const MAX_INGREDIENTS: usize = 20;

/// Accept strings (trimmed, blank → None) and numbers; anything else is None
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| clean_value(&v)))
}

fn clean_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One ingredient position on a meal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    pub ingredient: Option<String>,
    pub measure: Option<String>,
}

/// Full meal record from the search, random and lookup endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMeal")]
pub struct Meal {
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    /// Comma-joined, exactly as delivered
    pub tags: Option<String>,
    pub youtube: Option<String>,
    /// Always `MAX_INGREDIENTS` long; absent positions are empty slots
    pub slots: Vec<IngredientSlot>,
}

#[derive(Deserialize)]
struct RawMeal {
    #[serde(rename = "idMeal", default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(rename = "strMeal", default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(rename = "strCategory", default, deserialize_with = "lenient_string")]
    category: Option<String>,
    #[serde(rename = "strArea", default, deserialize_with = "lenient_string")]
    area: Option<String>,
    #[serde(rename = "strInstructions", default, deserialize_with = "lenient_string")]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb", default, deserialize_with = "lenient_string")]
    thumbnail: Option<String>,
    #[serde(rename = "strTags", default, deserialize_with = "lenient_string")]
    tags: Option<String>,
    #[serde(rename = "strYoutube", default, deserialize_with = "lenient_string")]
    youtube: Option<String>,
    #[serde(flatten)]
    rest: HashMap<String, Value>,
}

impl From<RawMeal> for Meal {
    fn from(raw: RawMeal) -> Self {
        let slot_field = |prefix: &str, n: usize| {
            raw.rest
                .get(&format!("{}{}", prefix, n))
                .and_then(clean_value)
        };

        let slots = (1..=MAX_INGREDIENTS)
            .map(|n| IngredientSlot {
                ingredient: slot_field("strIngredient", n),
                measure: slot_field("strMeasure", n),
            })
            .collect();

        Meal {
            id: raw.id.unwrap_or_default(),
            name: raw.name,
            category: raw.category,
            area: raw.area,
            instructions: raw.instructions,
            thumbnail: raw.thumbnail,
            tags: raw.tags,
            youtube: raw.youtube,
            slots,
        }
    }
}

impl Meal {
    /// Slots with a non-empty ingredient name, in slot order
    pub fn ingredients(&self) -> impl Iterator<Item = &IngredientSlot> {
        self.slots.iter().filter(|slot| slot.ingredient.is_some())
    }

    /// Whether any slot names an ingredient containing `needle`, ignoring case.
    /// Stops at the first matching slot.
    pub fn has_ingredient(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.slots.iter().any(|slot| {
            slot.ingredient
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
    }
}

/// Candidate meal from the filter endpoints: id, name and thumbnail only
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb", default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
}

/// Entry from `categories.php`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    #[serde(rename = "idCategory", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "strCategory", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "strCategoryThumb", default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(
        rename = "strCategoryDescription",
        default,
        deserialize_with = "lenient_string"
    )]
    pub description: Option<String>,
}

/// Entry from `list.php?a=list`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreaEntry {
    #[serde(rename = "strArea", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Entry from `list.php?i=list`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientEntry {
    #[serde(rename = "idIngredient", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "strIngredient", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "strDescription", default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "strType", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrabiata() -> Value {
        serde_json::json!({
            "idMeal": "52771",
            "strMeal": "Spicy Arrabiata Penne",
            "strCategory": "Vegetarian",
            "strArea": "Italian",
            "strInstructions": "Bring a large pot of water to a boil.",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/ustsqw1468250014.jpg",
            "strTags": "Pasta,Curry",
            "strYoutube": "https://www.youtube.com/watch?v=1IszT_guI08",
            "strIngredient1": "penne rigate",
            "strIngredient2": "olive oil",
            "strIngredient3": "garlic",
            "strIngredient4": "",
            "strIngredient5": null,
            "strMeasure1": "1 pound",
            "strMeasure2": "1/4 cup",
            "strMeasure3": " ",
            "strMeasure4": "",
            "strSource": null,
            "dateModified": null
        })
    }

    #[test]
    fn test_meal_deserialization() {
        let meal: Meal = serde_json::from_value(arrabiata()).unwrap();
        assert_eq!(meal.id, "52771");
        assert_eq!(meal.name.as_deref(), Some("Spicy Arrabiata Penne"));
        assert_eq!(meal.area.as_deref(), Some("Italian"));
        assert_eq!(meal.tags.as_deref(), Some("Pasta,Curry"));
        assert_eq!(meal.slots.len(), MAX_INGREDIENTS);
        assert_eq!(meal.slots[0].ingredient.as_deref(), Some("penne rigate"));
        assert_eq!(meal.slots[0].measure.as_deref(), Some("1 pound"));
        assert_eq!(meal.slots[2].measure, None);
        assert_eq!(meal.slots[3], IngredientSlot::default());
        assert_eq!(meal.ingredients().count(), 3);
    }

    #[test]
    fn test_meal_missing_fields() {
        let meal: Meal = serde_json::from_value(serde_json::json!({
            "idMeal": "1",
            "strCategory": null,
            "strTags": "   "
        }))
        .unwrap();
        assert!(meal.name.is_none());
        assert!(meal.category.is_none());
        assert!(meal.tags.is_none());
        assert_eq!(meal.ingredients().count(), 0);
    }

    #[test]
    fn test_has_ingredient_case_insensitive_substring() {
        let meal: Meal = serde_json::from_value(serde_json::json!({
            "idMeal": "2",
            "strIngredient7": "potatoes, diced"
        }))
        .unwrap();
        assert!(meal.has_ingredient("Potato"));
        assert!(meal.has_ingredient("DICED"));
        assert!(!meal.has_ingredient("rice"));
    }

    #[test]
    fn test_has_ingredient_ignores_measures() {
        let meal: Meal = serde_json::from_value(serde_json::json!({
            "idMeal": "3",
            "strIngredient1": "Water",
            "strMeasure1": "1 cup rice water"
        }))
        .unwrap();
        assert!(!meal.has_ingredient("rice"));
    }

    #[test]
    fn test_summary_and_category() {
        let summary: MealSummary = serde_json::from_value(serde_json::json!({
            "strMeal": "Kedgeree",
            "strMealThumb": "https://example.com/k.jpg",
            "idMeal": 52887
        }))
        .unwrap();
        assert_eq!(summary.id.as_deref(), Some("52887"));

        let category: Category = serde_json::from_value(serde_json::json!({
            "idCategory": "1",
            "strCategory": "Beef",
            "strCategoryThumb": "https://example.com/beef.png",
            "strCategoryDescription": "Beef is the culinary name for meat from cattle."
        }))
        .unwrap();
        assert_eq!(category.name.as_deref(), Some("Beef"));
        assert!(category.description.unwrap().starts_with("Beef"));
    }
}
