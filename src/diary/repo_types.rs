use serde::Serialize;
use sqlx::FromRow;

/// One ledger row joined to its food's per-unit nutrients.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DiaryRow {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub quantity: f64,
}

/// Per-day totals of `nutrient * quantity`. `None` means "no entries", which
/// is not the same thing as a day that adds up to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct DailySummary {
    pub total_calories: Option<f64>,
    pub total_protein: Option<f64>,
    pub total_carbs: Option<f64>,
    pub total_fat: Option<f64>,
}
