//! Read-only client for the public recipe catalog (TheMealDB).
//!
//! Two endpoints are used: `search.php?s=` and `lookup.php?i=`. There is no
//! retry and no rate-limit handling.

use thiserror::Error;
use tracing::{debug, warn};

use super::dto::{CatalogResponse, Dish};

/// Errors that can occur when talking to the recipe catalog.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("catalog returned status {0}")]
    Status(u16),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct RecipeClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecipeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Dishes whose name matches `query`. A blank query matches nothing and
    /// does not hit the network.
    pub async fn search(&self, query: &str) -> Result<Vec<Dish>, RecipeError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.fetch("search.php", "s", query).await?;
        let total = records.len();
        let dishes: Vec<Dish> = records.iter().filter_map(Dish::from_api).collect();
        if dishes.len() < total {
            warn!(skipped = total - dishes.len(), "catalog records without id or name");
        }
        debug!(query, found = dishes.len(), "recipe search");
        Ok(dishes)
    }

    /// The dish with catalog id `id`, if any.
    pub async fn lookup(&self, id: &str) -> Result<Option<Dish>, RecipeError> {
        let records = self.fetch("lookup.php", "i", id).await?;
        Ok(records.first().and_then(Dish::from_api))
    }

    async fn fetch(
        &self,
        endpoint: &str,
        param: &str,
        value: &str,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, RecipeError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self.http.get(&url).query(&[(param, value)]).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RecipeError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        let parsed: CatalogResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dishes::fake_catalog::spawn_catalog;

    #[tokio::test]
    async fn search_maps_results_and_skips_broken_records() {
        let client = RecipeClient::new(spawn_catalog().await);
        let dishes = client.search("arrabiata").await.unwrap();
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].id, "52771");
        assert_eq!(dishes[0].area.as_deref(), Some("Italian"));
        assert_eq!(dishes[0].ingredients, vec!["penne rigate"]);
    }

    #[tokio::test]
    async fn search_encodes_the_query() {
        let client = RecipeClient::new(spawn_catalog().await);
        let dishes = client.search("mac & cheese").await.unwrap();
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].name, "Mac & Cheese");
    }

    #[tokio::test]
    async fn no_match_is_empty() {
        let client = RecipeClient::new(spawn_catalog().await);
        assert!(client.search("zzz").await.unwrap().is_empty());
        assert!(client.lookup("0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_query_is_always_empty() {
        // nothing listens here; a request would fail
        let client = RecipeClient::new("http://127.0.0.1:9/");
        assert!(client.search("").await.unwrap().is_empty());
        assert!(client.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_returns_first_record() {
        let client = RecipeClient::new(spawn_catalog().await);
        let dish = client.lookup("52771").await.unwrap().expect("dish exists");
        assert_eq!(dish.ingredients, vec!["penne rigate", "olive oil"]);
        assert_eq!(dish.measures, vec!["1 pound", "1/4 cup"]);
    }

    #[tokio::test]
    async fn upstream_failures_are_typed() {
        let base = spawn_catalog().await;

        let broken = RecipeClient::new(format!("{}broken", base));
        assert!(matches!(
            broken.search("x").await,
            Err(RecipeError::Status(502))
        ));

        let garbage = RecipeClient::new(format!("{}garbage", base));
        assert!(matches!(
            garbage.search("x").await,
            Err(RecipeError::Parse(_))
        ));

        let unreachable = RecipeClient::new("http://127.0.0.1:9/");
        assert!(matches!(
            unreachable.lookup("1").await,
            Err(RecipeError::Http(_))
        ));
    }
}
