//! TheMealDB lookup client
//!
//! Every request is a single GET with a fixed timeout and fixed headers.
//! Failures never surface as errors: they become [`Lookup::Failed`], which
//! callers may treat exactly like [`Lookup::Empty`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::MealDbConfig;
use crate::error::LookupError;
use crate::model::{AreaEntry, Category, IngredientEntry, Meal, MealSummary};

/// Outcome of a remote lookup
#[derive(Debug)]
pub enum Lookup<T> {
    /// The API answered with at least one result
    Found(T),
    /// The API answered but had nothing for the query
    Empty,
    /// The request did not produce a usable answer
    Failed(LookupError),
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Collapse `Empty` and `Failed` into `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Empty | Lookup::Failed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Empty => Lookup::Empty,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Lookup<U>) -> Lookup<U> {
        match self {
            Lookup::Found(value) => f(value),
            Lookup::Empty => Lookup::Empty,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }
}

/// The two endpoints the ingredient search is built on
#[async_trait]
pub trait MealSource: Send + Sync {
    /// Candidates containing a single ingredient (summary records only)
    async fn filter_by_ingredient(&self, ingredient: &str) -> Lookup<Vec<MealSummary>>;

    /// Full record for one meal id
    async fn lookup_meal(&self, id: &str) -> Lookup<Meal>;
}

/// HTTP client for TheMealDB
#[derive(Debug, Clone)]
pub struct MealDbClient {
    http: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(config: &MealDbConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `<base>/<endpoint>?<query>` and parse the body as JSON
    pub async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Lookup<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, query = ?query, "MealDB request");

        let response = match self.http.get(&url).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = LookupError::from(e);
                warn!(url = %url, error = %err, "MealDB request failed");
                return Lookup::Failed(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "MealDB returned an error status");
            return Lookup::Failed(LookupError::Status(status.as_u16()));
        }

        match response.json::<Value>().await {
            Ok(body) => {
                debug!(url = %url, status = status.as_u16(), "MealDB response");
                Lookup::Found(body)
            }
            Err(e) => {
                let err = LookupError::from(e);
                warn!(url = %url, error = %err, "MealDB response unreadable");
                Lookup::Failed(err)
            }
        }
    }

    /// Fetch and decode the array stored under `key` in the response body
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        key: &str,
    ) -> Lookup<Vec<T>> {
        self.fetch(endpoint, query)
            .await
            .and_then(|body| extract_list(body, key))
    }

    pub async fn search_by_name(&self, name: &str) -> Lookup<Vec<Meal>> {
        self.fetch_list("search.php", &[("s", name)], "meals").await
    }

    pub async fn search_by_first_letter(&self, letter: &str) -> Lookup<Vec<Meal>> {
        self.fetch_list("search.php", &[("f", letter)], "meals").await
    }

    pub async fn random_meal(&self) -> Lookup<Vec<Meal>> {
        self.fetch_list("random.php", &[], "meals").await
    }

    pub async fn categories(&self) -> Lookup<Vec<Category>> {
        self.fetch_list("categories.php", &[], "categories").await
    }

    pub async fn filter_by_ingredient(&self, ingredient: &str) -> Lookup<Vec<MealSummary>> {
        self.fetch_list("filter.php", &[("i", ingredient)], "meals").await
    }

    pub async fn filter_by_category(&self, category: &str) -> Lookup<Vec<MealSummary>> {
        self.fetch_list("filter.php", &[("c", category)], "meals").await
    }

    pub async fn filter_by_area(&self, area: &str) -> Lookup<Vec<MealSummary>> {
        self.fetch_list("filter.php", &[("a", area)], "meals").await
    }

    pub async fn lookup_meal(&self, id: &str) -> Lookup<Meal> {
        self.fetch_list::<Meal>("lookup.php", &[("i", id)], "meals")
            .await
            .and_then(|meals| match meals.into_iter().next() {
                Some(meal) => Lookup::Found(meal),
                None => Lookup::Empty,
            })
    }

    pub async fn list_areas(&self) -> Lookup<Vec<AreaEntry>> {
        self.fetch_list("list.php", &[("a", "list")], "meals").await
    }

    pub async fn list_ingredients(&self) -> Lookup<Vec<IngredientEntry>> {
        self.fetch_list("list.php", &[("i", "list")], "meals").await
    }
}

#[async_trait]
impl MealSource for MealDbClient {
    async fn filter_by_ingredient(&self, ingredient: &str) -> Lookup<Vec<MealSummary>> {
        MealDbClient::filter_by_ingredient(self, ingredient).await
    }

    async fn lookup_meal(&self, id: &str) -> Lookup<Meal> {
        MealDbClient::lookup_meal(self, id).await
    }
}

/// `null`, a missing key and `[]` all mean "no results"
fn extract_list<T: DeserializeOwned>(mut body: Value, key: &str) -> Lookup<Vec<T>> {
    let items = match body.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => return Lookup::Empty,
        Some(items) => items,
    };

    match serde_json::from_value::<Vec<T>>(items) {
        Ok(items) if items.is_empty() => Lookup::Empty,
        Ok(items) => Lookup::Found(items),
        Err(e) => {
            warn!(key = key, error = %e, "MealDB list has an unexpected shape");
            Lookup::Failed(e.into())
        }
    }
}
