//! Read-only catalog listings exposed as MCP resources
//!
//! Each listing reshapes one upstream list endpoint into
//! `{ "count": n, "items": [{ "name", "description" }] }`.

use anyhow::{Result, anyhow};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{Lookup, MealDbClient};

/// A resource as advertised to clients
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NamedEntry {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Listing {
    pub count: usize,
    pub items: Vec<NamedEntry>,
}

impl Listing {
    fn new(items: Vec<NamedEntry>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Catalog {
    Categories,
    Areas,
    Ingredients,
}

const CATALOGS: [Catalog; 3] = [Catalog::Categories, Catalog::Areas, Catalog::Ingredients];

impl Catalog {
    fn uri(self) -> &'static str {
        match self {
            Catalog::Categories => "mealdb://categories",
            Catalog::Areas => "mealdb://areas",
            Catalog::Ingredients => "mealdb://ingredients",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Catalog::Categories => "categories",
            Catalog::Areas => "areas",
            Catalog::Ingredients => "ingredients",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Catalog::Categories => "All meal categories with descriptions",
            Catalog::Areas => "All cuisines/areas meals are tagged with",
            Catalog::Ingredients => "All known ingredients with descriptions",
        }
    }

    fn from_uri(uri: &str) -> Option<Self> {
        CATALOGS.into_iter().find(|c| c.uri() == uri)
    }
}

/// Serves the categories, areas and ingredients listings
pub struct CatalogResources {
    client: Arc<MealDbClient>,
}

impl CatalogResources {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Vec<ResourceDefinition> {
        CATALOGS
            .iter()
            .map(|c| ResourceDefinition {
                uri: c.uri().to_string(),
                name: c.name().to_string(),
                description: c.description().to_string(),
                mime_type: "application/json".to_string(),
            })
            .collect()
    }

    /// Fetch a listing; an unavailable upstream yields an empty listing
    pub async fn listing(&self, uri: &str) -> Result<Listing> {
        let catalog = Catalog::from_uri(uri).ok_or_else(|| anyhow!("Unknown resource: {}", uri))?;
        debug!("Reading resource {}", uri);

        let lookup: Lookup<Vec<NamedEntry>> = match catalog {
            Catalog::Categories => self.client.categories().await.map(|items| {
                items
                    .into_iter()
                    .filter_map(|c| {
                        Some(NamedEntry {
                            name: c.name?,
                            description: c.description,
                        })
                    })
                    .collect()
            }),
            Catalog::Areas => self.client.list_areas().await.map(|items| {
                items
                    .into_iter()
                    .filter_map(|a| {
                        Some(NamedEntry {
                            name: a.name?,
                            description: None,
                        })
                    })
                    .collect()
            }),
            Catalog::Ingredients => self.client.list_ingredients().await.map(|items| {
                items
                    .into_iter()
                    .filter_map(|i| {
                        Some(NamedEntry {
                            name: i.name?,
                            description: i.description,
                        })
                    })
                    .collect()
            }),
        };

        Ok(match lookup {
            Lookup::Found(items) => Listing::new(items),
            Lookup::Empty => Listing::new(vec![]),
            Lookup::Failed(e) => {
                warn!(uri = uri, error = %e, "Catalog unavailable, returning empty listing");
                Listing::new(vec![])
            }
        })
    }

    /// Listing rendered as pretty JSON text
    pub async fn read(&self, uri: &str) -> Result<String> {
        let listing = self.listing(uri).await?;
        Ok(serde_json::to_string_pretty(&listing)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MealDbConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resources_for(server: &MockServer) -> CatalogResources {
        let config = MealDbConfig {
            api_base: Some(server.uri()),
            ..Default::default()
        };
        CatalogResources::new(Arc::new(MealDbClient::new(&config).unwrap()))
    }

    #[test]
    fn test_list_advertises_three_catalogs() {
        let client = Arc::new(MealDbClient::new(&MealDbConfig::default()).unwrap());
        let resources = CatalogResources::new(client).list();
        let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec!["mealdb://categories", "mealdb://areas", "mealdb://ingredients"]
        );
        assert!(resources.iter().all(|r| r.mime_type == "application/json"));
    }

    #[tokio::test]
    async fn test_areas_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list.php"))
            .and(query_param("a", "list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meals": [{"strArea": "American"}, {"strArea": "British"}, {"strArea": null}]
            })))
            .mount(&server)
            .await;

        let listing = resources_for(&server).listing("mealdb://areas").await.unwrap();
        assert_eq!(listing.count, 2);
        assert_eq!(listing.items[0].name, "American");
        assert!(listing.items[0].description.is_none());
    }

    #[tokio::test]
    async fn test_ingredients_listing_json_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list.php"))
            .and(query_param("i", "list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meals": [{
                    "idIngredient": "1",
                    "strIngredient": "Chicken",
                    "strDescription": "The chicken is a domesticated bird.",
                    "strType": null
                }]
            })))
            .mount(&server)
            .await;

        let text = resources_for(&server).read("mealdb://ingredients").await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["items"][0]["name"], "Chicken");
        assert_eq!(
            json["items"][0]["description"],
            "The chicken is a domesticated bird."
        );
    }

    #[tokio::test]
    async fn test_unavailable_upstream_gives_empty_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let listing = resources_for(&server)
            .listing("mealdb://categories")
            .await
            .unwrap();
        assert_eq!(listing, Listing { count: 0, items: vec![] });
    }

    #[tokio::test]
    async fn test_unknown_uri_is_error() {
        let server = MockServer::start().await;
        let result = resources_for(&server).read("mealdb://desserts").await;
        assert!(result.unwrap_err().to_string().contains("Unknown resource"));
    }
}
