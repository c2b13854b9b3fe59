//! Upstream API configuration passed to the lookup client

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default public base URL; the trailing segment is the access-tier key
pub const DEFAULT_API_ROOT: &str = "https://www.themealdb.com/api/json/v1";

/// Settings for talking to TheMealDB
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealDbConfig {
    /// Access-tier key. "1" is the public test key.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Full base URL override; when unset the URL is derived from `api_key`
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Number of meal detail fetches in flight during an ingredient search.
    /// 1 keeps the search strictly sequential.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
}

fn default_api_key() -> String {
    "1".to_string()
}

fn default_user_agent() -> String {
    "mealserver-app/1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_detail_concurrency() -> usize {
    1
}

impl Default for MealDbConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            api_base: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            detail_concurrency: default_detail_concurrency(),
        }
    }
}

impl MealDbConfig {
    /// Base URL every endpoint is joined onto, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("{}/{}", DEFAULT_API_ROOT, self.api_key),
        }
    }

    /// Check the values the client relies on
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url();
        let url = Url::parse(&base).with_context(|| format!("Invalid MealDB base URL: {}", base))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("MealDB base URL must use http or https, got '{}'", url.scheme());
        }
        if self.api_base.is_none() && self.api_key.trim().is_empty() {
            bail!("mealdb.api_key must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("mealdb.timeout_secs must be greater than zero");
        }
        if self.detail_concurrency == 0 {
            bail!("mealdb.detail_concurrency must be at least 1");
        }
        Ok(())
    }
}
