use serde::Serialize;
use sqlx::FromRow;

/// Catalog row. Nutrient values are per unit of quantity.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Validated input for `find_or_create`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}
