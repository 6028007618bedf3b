use std::fmt::Debug;
use std::sync::Arc;

use crate::config::DEFAULT_SEASON_LENGTH;
use crate::errors::EngineError;
use crate::models::Series;

/// Options passed to every fit call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Observations per seasonal cycle
    pub season_length: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            season_length: DEFAULT_SEASON_LENGTH,
        }
    }
}

/// A fitted model, bound to the series it was trained on.
pub trait TrainedModel: Send + Sync + Debug {
    /// Point forecasts for the next `horizon` steps after the training data.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>, EngineError>;

    /// Short human readable description, e.g. "ETS(A,Ad,N)".
    fn describe(&self) -> String;
}

/// Statistical fitting capability. Implementations run on the calling
/// thread and must be deterministic for a given series.
pub trait ForecastEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit(&self, series: &Series, options: &FitOptions)
        -> Result<Arc<dyn TrainedModel>, EngineError>;
}
