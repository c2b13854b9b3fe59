//! Prompt templates that steer an agent through the meal tools

use anyhow::{Result, anyhow, bail};
use std::collections::HashMap;

/// One argument a prompt accepts
#[derive(Debug, Clone, PartialEq)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A named template with `{placeholder}` arguments
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptArgument],
    template: &'static str,
    defaults: &'static [(&'static str, &'static str)],
}

/// Prompt text ready to hand to a client
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub description: String,
    pub text: String,
}

const BUILT_IN_PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "cook_with_ingredients",
        description: "Suggest recipes that use ingredients already at hand",
        arguments: &[PromptArgument {
            name: "ingredients",
            description: "Comma-separated ingredients, most distinctive first",
            required: true,
        }],
        template: "I have these ingredients: {ingredients}.\n\n\
                   Call get_meal_by_multiple_ingredients with them as a list to find meals \
                   that use all of them. If nothing matches, drop the last ingredient and \
                   try again. For the best match, list what else I would need to buy and \
                   summarize the steps.",
        defaults: &[],
    },
    PromptTemplate {
        name: "explore_cuisine",
        description: "Tour the dishes of one cuisine",
        arguments: &[PromptArgument {
            name: "area",
            description: "Cuisine or area, e.g. Italian or Japanese",
            required: true,
        }],
        template: "I want to explore {area} cooking.\n\n\
                   Call get_meal_by_area for \"{area}\" and pick three dishes that show the \
                   range of the cuisine. Fetch each with get_meal_by_id and, for each, explain \
                   what makes it typical of {area} food.",
        defaults: &[],
    },
    PromptTemplate {
        name: "weekly_meal_plan",
        description: "Plan varied dinners for several days",
        arguments: &[
            PromptArgument {
                name: "days",
                description: "Number of days to plan (default 7)",
                required: false,
            },
            PromptArgument {
                name: "preferences",
                description: "Dietary preferences or dislikes",
                required: false,
            },
        ],
        template: "Plan dinners for {days} days. Preferences: {preferences}.\n\n\
                   Use get_categories to see what is available, then get_meal_by_category to \
                   choose dishes from different categories so no two days feel alike. Fill gaps \
                   with get_random_meal. Finish with one combined shopping list.",
        defaults: &[("days", "7"), ("preferences", "none")],
    },
    PromptTemplate {
        name: "surprise_me",
        description: "Pick a random dinner and walk through it",
        arguments: &[],
        template: "Surprise me with something to cook tonight.\n\n\
                   Call get_random_meal, then give me the ingredient list and the steps in a \
                   friendly, easy-to-follow way.",
        defaults: &[],
    },
];

/// The set of prompts the server offers
pub struct PromptLibrary {
    prompts: &'static [PromptTemplate],
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self {
            prompts: BUILT_IN_PROMPTS,
        }
    }

    pub fn list(&self) -> &[PromptTemplate] {
        self.prompts
    }

    /// Fill a prompt's placeholders. Missing required arguments are an error;
    /// missing optional ones use their defaults.
    pub fn render(&self, name: &str, args: &HashMap<String, String>) -> Result<RenderedPrompt> {
        let prompt = self
            .prompts
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| anyhow!("Unknown prompt: {}", name))?;

        let mut values: Vec<(&str, &str)> = Vec::with_capacity(prompt.arguments.len());
        for arg in prompt.arguments {
            let value = match args.get(arg.name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(v) => v,
                None if arg.required => {
                    bail!("Missing required argument '{}' for prompt '{}'", arg.name, name)
                }
                None => prompt
                    .defaults
                    .iter()
                    .find(|(key, _)| *key == arg.name)
                    .map(|(_, default)| *default)
                    .unwrap_or(""),
            };
            values.push((arg.name, value));
        }

        Ok(RenderedPrompt {
            description: prompt.description.to_string(),
            text: fill_placeholders(prompt.template, &values),
        })
    }
}

/// Replace `{name}` placeholders in one pass; substituted text is never rescanned
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
