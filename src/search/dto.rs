use serde::{Deserialize, Serialize};

/// Query string of `GET /search`. Both fields are optional at the extractor
/// level so missing values can be reported with our own error body.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

/// One search hit. Nutrients the upstream record does not carry are left out
/// of the JSON object entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

// ---- USDA FoodData Central wire format (subset) ----

#[derive(Debug, Deserialize)]
pub struct UsdaSearchResponse {
    pub foods: Vec<UsdaFood>,
}

#[derive(Debug, Deserialize)]
pub struct UsdaFood {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "foodNutrients", default)]
    pub food_nutrients: Vec<UsdaFoodNutrient>,
}

#[derive(Debug, Deserialize)]
pub struct UsdaFoodNutrient {
    #[serde(rename = "nutrientName")]
    pub nutrient_name: Option<String>,
    #[serde(rename = "unitName")]
    pub unit_name: Option<String>,
    pub value: Option<f64>,
}
