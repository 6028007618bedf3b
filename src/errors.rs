use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or cleaning one dataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No usable rows after cleaning: {}", .0.display())]
    Empty(PathBuf),
    #[error("Failed to parse {}: {reason}", .path.display())]
    ParseFailure { path: PathBuf, reason: String },
}

/// Failures raised by a forecasting engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("invalid horizon: {0}")]
    InvalidHorizon(usize),
    #[error("model produced non-finite values")]
    NonFinite,
    #[error("{0}")]
    Fit(String),
}

#[derive(Debug, Error)]
#[error("Training failed for {index}: {cause}")]
pub struct TrainError {
    pub index: String,
    pub cause: EngineError,
}

/// Outcome error for one dataset during bootstrap
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Train(#[from] TrainError),
}

/// Errors returned to forecast callers as values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Invalid index")]
    InvalidIndex,
    #[error("Forecasting failed: {0}")]
    ForecastFailure(String),
}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidIndex => StatusCode::NOT_FOUND,
            QueryError::ForecastFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for QueryError {
    fn from(value: EngineError) -> Self {
        QueryError::ForecastFailure(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_messages() {
        assert_eq!(QueryError::InvalidIndex.to_string(), "Invalid index");
        assert_eq!(
            QueryError::ForecastFailure("boom".to_string()).to_string(),
            "Forecasting failed: boom"
        );
    }

    #[test]
    fn test_engine_error_converts_to_forecast_failure() {
        let err: QueryError = EngineError::InvalidHorizon(0).into();
        assert_eq!(err.to_string(), "Forecasting failed: invalid horizon: 0");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
