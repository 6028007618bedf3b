use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::QueryError;

pub const DEFAULT_INDEX: &str = "nasdaq";
pub const DEFAULT_HORIZON_DAYS: usize = 365;

/// Single point in a smoothed forecast time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: String, // YYYY-MM-DD
    pub yhat: f64,  // rounded to 2 decimals
}

impl ForecastPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            ds: date.format("%Y-%m-%d").to_string(),
            yhat: round_2dp(value),
        }
    }
}

/// Query parameters for a forecast request
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastQuery {
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_horizon", alias = "horizon_days")]
    pub days: usize,
}

impl Default for ForecastQuery {
    fn default() -> Self {
        Self {
            index: default_index(),
            days: default_horizon(),
        }
    }
}

/// Query parameters when the index is part of the path
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonQuery {
    #[serde(default = "default_horizon", alias = "horizon_days")]
    pub days: usize,
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON_DAYS
}

/// Result of a forecast query, serialized as either
/// `{"forecast": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastResponse {
    Forecast { forecast: Vec<ForecastPoint> },
    Error { error: String },
}

impl From<Result<Vec<ForecastPoint>, QueryError>> for ForecastResponse {
    fn from(result: Result<Vec<ForecastPoint>, QueryError>) -> Self {
        match result {
            Ok(forecast) => ForecastResponse::Forecast { forecast },
            Err(e) => ForecastResponse::Error { error: e.to_string() },
        }
    }
}

/// Summary of one loaded index, as listed by `/api/indices`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub index: String,
    pub observations: usize,
    pub first_date: String,
    pub anchor_date: String,
    pub model: String,
}

pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
