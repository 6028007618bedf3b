use std::sync::Arc;

use crate::models::{IndexKey, IndexSummary, Series};
use crate::services::forecast_engine::TrainedModel;
use crate::services::model_registry::ModelRegistry;
use crate::services::series_archive::SeriesArchive;

/// Owns the model registry and the series archive. Built once at startup and
/// shared read-only with the query handlers.
#[derive(Debug, Default)]
pub struct ForecastCache {
    models: ModelRegistry,
    archive: SeriesArchive,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a trained model and its series under `key`. Both maps are
    /// written together so a key is never present in only one of them.
    pub fn install(&mut self, key: IndexKey, model: Arc<dyn TrainedModel>, series: Series) {
        self.models.insert(key.clone(), model);
        self.archive.put(key, series);
    }

    /// Model and series for `key`, or `None` if the index was never loaded
    pub fn lookup(&self, key: &str) -> Option<(&Arc<dyn TrainedModel>, &Series)> {
        Some((self.models.get(key)?, self.archive.get(key)?))
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn archive(&self) -> &SeriesArchive {
        &self.archive
    }

    pub fn contains(&self, key: &str) -> bool {
        self.models.contains(key) && self.archive.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.models.keys()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn summaries(&self) -> Vec<IndexSummary> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let (model, series) = self.lookup(key)?;
                Some(IndexSummary {
                    index: key.to_string(),
                    observations: series.len(),
                    first_date: series.first_date().to_string(),
                    anchor_date: series.last_date().to_string(),
                    model: model.describe(),
                })
            })
            .collect()
    }
}
