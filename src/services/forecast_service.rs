use chrono::{Duration, NaiveDate};

use crate::errors::{EngineError, QueryError};
use crate::models::ForecastPoint;
use crate::services::forecast_cache::ForecastCache;

/// Trailing moving-average window applied to raw predictions
pub const SMOOTHING_WINDOW: usize = 7;

/// Longest horizon served, twenty years of calendar days
pub const MAX_HORIZON_DAYS: usize = 7300;

/// Smoothed forecast for `key`, `horizon_days` calendar days past the last
/// observation. A horizon of zero yields an empty forecast; horizons above
/// [`MAX_HORIZON_DAYS`] are a `ForecastFailure`.
pub fn forecast(
    cache: &ForecastCache,
    key: &str,
    horizon_days: usize,
) -> Result<Vec<ForecastPoint>, QueryError> {
    let (model, series) = cache.lookup(key).ok_or(QueryError::InvalidIndex)?;

    if horizon_days == 0 {
        return Ok(Vec::new());
    }
    if horizon_days > MAX_HORIZON_DAYS {
        return Err(EngineError::InvalidHorizon(horizon_days).into());
    }

    let raw = model.predict(horizon_days)?;

    if raw.len() != horizon_days {
        return Err(QueryError::ForecastFailure(format!(
            "model returned {} values for a horizon of {}",
            raw.len(),
            horizon_days
        )));
    }
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(QueryError::ForecastFailure(
            "model produced non-finite values".to_string(),
        ));
    }

    let smoothed = trailing_mean(&raw, SMOOTHING_WINDOW);
    anchor(series.last_date(), &smoothed)
}

/// Trailing simple moving average with minimum periods of one:
/// `out[i] = mean(values[max(0, i + 1 - window) ..= i])`.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        out.push(sum / count as f64);
    }

    out
}

/// Attach dates `anchor + 1 day`, `anchor + 2 days`, ... and round values.
fn anchor(anchor_date: NaiveDate, values: &[f64]) -> Result<Vec<ForecastPoint>, QueryError> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let date = anchor_date
                .checked_add_signed(Duration::days(i as i64 + 1))
                .ok_or_else(|| {
                    QueryError::ForecastFailure(format!(
                        "forecast date out of range after {}",
                        anchor_date
                    ))
                })?;
            Ok(ForecastPoint::new(date, value))
        })
        .collect()
}
