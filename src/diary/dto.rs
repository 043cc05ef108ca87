use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use super::repo_types::DiaryRow;
use crate::{error::AppError, foods::NewFood};

/// Food as sent by the client. Everything is optional here so that missing
/// fields come back as our own 400 instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct FoodPayload {
    #[serde(default)]
    pub name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

/// Body of `POST /diary`.
#[derive(Debug, Deserialize)]
pub struct LogFoodRequest {
    pub food: FoodPayload,
    pub date: Option<String>,
    pub quantity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<DiaryRow>,
}

/// A log-food request that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry {
    pub food: NewFood,
    pub date: Date,
    pub quantity: f64,
}

pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::bad_request("Invalid date, expected YYYY-MM-DD"))
}

fn nutrient(field: &str, value: Option<f64>) -> Result<f64, AppError> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(_) => Err(AppError::bad_request(format!(
            "food.{field} must be a non-negative number"
        ))),
        None => Err(AppError::bad_request(format!("food.{field} is required"))),
    }
}

impl DateQuery {
    pub fn date(&self) -> Result<Date, AppError> {
        match self.date.as_deref() {
            None | Some("") => Err(AppError::bad_request("Missing date parameter")),
            Some(raw) => parse_date(raw),
        }
    }
}

impl LogFoodRequest {
    /// Nutrients must be finite and >= 0. An absent or `null` quantity means 1;
    /// an explicit 0 is rejected, not treated as absent. Any other quantity
    /// must be finite and > 0. The name is kept byte for byte, it only has to
    /// be non-blank.
    pub fn validate(self) -> Result<ValidatedEntry, AppError> {
        if self.food.name.trim().is_empty() {
            return Err(AppError::bad_request("food.name is required"));
        }
        let food = NewFood {
            calories: nutrient("calories", self.food.calories)?,
            protein: nutrient("protein", self.food.protein)?,
            carbs: nutrient("carbs", self.food.carbs)?,
            fat: nutrient("fat", self.food.fat)?,
            name: self.food.name,
        };

        let date = match self.date.as_deref() {
            None | Some("") => return Err(AppError::bad_request("date is required")),
            Some(raw) => parse_date(raw)?,
        };

        let quantity = match self.quantity {
            None => 1.0,
            Some(q) if q.is_finite() && q > 0.0 => q,
            Some(_) => return Err(AppError::bad_request("quantity must be a positive number")),
        };

        Ok(ValidatedEntry {
            food,
            date,
            quantity,
        })
    }
}
