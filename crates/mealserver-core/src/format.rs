//! Plain-text rendering of meals and categories for tool results
//!
//! Every field is always rendered; missing values print a placeholder.

use crate::model::{Category, Meal, MealSummary};

/// Separator between records in a multi-record tool result
pub const RECORD_SEPARATOR: &str = "\n---\n";

const UNKNOWN: &str = "Unknown";
const NO_INSTRUCTIONS: &str = "No instruction available";
const NO_THUMBNAIL: &str = "No thumbnail provided";
const NO_TAGS: &str = "No tags provided";
const NO_YOUTUBE: &str = "No YouTube link provided";
const NO_DESCRIPTION: &str = "No description provided";
const NO_INGREDIENTS: &str = "None listed";

fn or<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value.as_deref().unwrap_or(placeholder)
}

/// Render a full meal record
pub fn format_meal(meal: &Meal) -> String {
    let mut output = String::new();
    output.push_str(&format!("Meal: {}\n", or(&meal.name, UNKNOWN)));
    output.push_str(&format!("Category: {}\n", or(&meal.category, UNKNOWN)));
    output.push_str(&format!("Area: {}\n", or(&meal.area, UNKNOWN)));

    let lines: Vec<String> = meal
        .ingredients()
        .filter_map(|slot| {
            let ingredient = slot.ingredient.as_deref()?;
            Some(match slot.measure.as_deref() {
                Some(measure) => format!("- {} {}", measure, ingredient),
                None => format!("- {}", ingredient),
            })
        })
        .collect();

    if lines.is_empty() {
        output.push_str(&format!("Ingredients: {}\n", NO_INGREDIENTS));
    } else {
        output.push_str("Ingredients:\n");
        for line in &lines {
            output.push_str(line);
            output.push('\n');
        }
    }

    output.push_str(&format!(
        "Instructions: {}\n",
        or(&meal.instructions, NO_INSTRUCTIONS)
    ));
    output.push_str(&format!("Thumbnail: {}\n", or(&meal.thumbnail, NO_THUMBNAIL)));
    output.push_str(&format!("Tags: {}\n", or(&meal.tags, NO_TAGS)));
    output.push_str(&format!("Youtube: {}", or(&meal.youtube, NO_YOUTUBE)));
    output
}

/// Render a filter-endpoint candidate
pub fn format_meal_summary(summary: &MealSummary) -> String {
    format!(
        "Meal: {}\nId: {}\nThumbnail: {}",
        or(&summary.name, UNKNOWN),
        or(&summary.id, UNKNOWN),
        or(&summary.thumbnail, NO_THUMBNAIL),
    )
}

pub fn format_category(category: &Category) -> String {
    format!(
        "Category: {}\nThumbnail: {}\nDescription: {}",
        or(&category.name, UNKNOWN),
        or(&category.thumbnail, NO_THUMBNAIL),
        or(&category.description, NO_DESCRIPTION),
    )
}

/// Render a list of meals joined by `RECORD_SEPARATOR`
pub fn format_meals(meals: &[Meal]) -> String {
    meals
        .iter()
        .map(format_meal)
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}
