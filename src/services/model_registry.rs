use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::errors::TrainError;
use crate::models::{IndexKey, Series};
use crate::services::forecast_engine::{FitOptions, ForecastEngine, TrainedModel};

/// Trained model per index. Filled during bootstrap, read-only afterwards.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<IndexKey, Arc<dyn TrainedModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit a model for `key`. Does not touch the registry; the caller installs
    /// the model together with its series.
    pub fn train(
        key: &str,
        series: &Series,
        engine: &dyn ForecastEngine,
        options: &FitOptions,
    ) -> Result<Arc<dyn TrainedModel>, TrainError> {
        debug!(
            "Fitting {} model for {} on {} observations (season length {})",
            engine.name(),
            key,
            series.len(),
            options.season_length
        );
        engine.fit(series, options).map_err(|cause| TrainError {
            index: key.to_string(),
            cause,
        })
    }

    pub(crate) fn insert(&mut self, key: IndexKey, model: Arc<dyn TrainedModel>) {
        self.models.insert(key, model);
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn TrainedModel>> {
        self.models.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.models.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
