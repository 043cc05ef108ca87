use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

use super::dto::{SearchResult, UsdaFood, UsdaSearchResponse};
use crate::config::UsdaConfig;

#[async_trait]
pub trait FoodSearchClient: Send + Sync {
    async fn search(&self, query: &str, page_size: u32) -> anyhow::Result<Vec<SearchResult>>;
}

/// Client for `GET {base_url}/foods/search`. One request per call; no cache,
/// no retry.
#[derive(Clone)]
pub struct UsdaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(config: &UsdaConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build usda http client")?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl FoodSearchClient for UsdaClient {
    async fn search(&self, query: &str, page_size: u32) -> anyhow::Result<Vec<SearchResult>> {
        let url = format!("{}/foods/search", self.base_url);
        let page_size = page_size.to_string();
        let body: UsdaSearchResponse = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .context("usda request")?
            .error_for_status()
            .context("usda status")?
            .json()
            .await
            .context("usda decode")?;

        debug!(query, hits = body.foods.len(), "usda search ok");
        Ok(body.foods.into_iter().map(map_food).collect())
    }
}

/// Picks calories, protein, carbs and fat out of a USDA record. When a
/// nutrient appears more than once the last entry wins.
pub fn map_food(food: UsdaFood) -> SearchResult {
    let mut out = SearchResult {
        name: food.description,
        calories: None,
        protein: None,
        carbs: None,
        fat: None,
    };
    for n in food.food_nutrients {
        let Some(name) = n.nutrient_name.as_deref() else {
            continue;
        };
        match name {
            "Energy" if n.unit_name.as_deref() == Some("KCAL") => out.calories = n.value,
            "Protein" => out.protein = n.value,
            "Carbohydrate, by difference" => out.carbs = n.value,
            "Total lipid (fat)" => out.fat = n.value,
            _ => {}
        }
    }
    out
}
