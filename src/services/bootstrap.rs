use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::DatasetConfig;
use crate::errors::BootstrapError;
use crate::models::{IndexKey, Series};
use crate::services::forecast_cache::ForecastCache;
use crate::services::forecast_engine::{FitOptions, ForecastEngine, TrainedModel};
use crate::services::model_registry::ModelRegistry;
use crate::services::series_loader;

/// What a successfully loaded dataset looked like
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub observations: usize,
    pub anchor_date: NaiveDate,
    pub model: String,
}

/// Per-dataset result of the startup run
#[derive(Debug)]
pub struct DatasetOutcome {
    pub key: IndexKey,
    pub outcome: Result<DatasetSummary, BootstrapError>,
}

#[derive(Debug)]
pub struct BootstrapReport {
    pub cache: ForecastCache,
    pub outcomes: Vec<DatasetOutcome>,
}

impl BootstrapReport {
    pub fn loaded(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.is_ok())
            .map(|o| o.key.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.is_err())
            .map(|o| o.key.as_str())
            .collect()
    }
}

struct Trained {
    model: Arc<dyn TrainedModel>,
    series: Series,
}

/// Load and train every configured dataset, then install the successes.
///
/// Datasets are processed one at a time in key order. A failure only removes
/// that dataset; the rest still load.
pub fn bootstrap(
    datasets: &BTreeMap<IndexKey, DatasetConfig>,
    engine: &dyn ForecastEngine,
    options: &FitOptions,
) -> BootstrapReport {
    info!(
        "Bootstrapping {} datasets with the {} engine",
        datasets.len(),
        engine.name()
    );

    let results: Vec<(IndexKey, Result<Trained, BootstrapError>)> = datasets
        .iter()
        .map(|(key, dataset)| (key.clone(), prepare(key, dataset, engine, options)))
        .collect();

    let mut cache = ForecastCache::new();
    let outcomes = results
        .into_iter()
        .map(|(key, result)| {
            let outcome = result.map(|trained| {
                let summary = DatasetSummary {
                    observations: trained.series.len(),
                    anchor_date: trained.series.last_date(),
                    model: trained.model.describe(),
                };
                cache.install(key.clone(), trained.model, trained.series);
                summary
            });
            log_outcome(&key, &outcome);
            DatasetOutcome { key, outcome }
        })
        .collect();

    let report = BootstrapReport { cache, outcomes };
    info!(
        "Bootstrap complete: {} loaded, {} failed",
        report.loaded().len(),
        report.failed().len()
    );
    report
}

fn prepare(
    key: &str,
    dataset: &DatasetConfig,
    engine: &dyn ForecastEngine,
    options: &FitOptions,
) -> Result<Trained, BootstrapError> {
    let series = series_loader::load(&dataset.path, &dataset.columns())?;
    let model = ModelRegistry::train(key, &series, engine, options)?;
    Ok(Trained { model, series })
}

fn log_outcome(key: &str, outcome: &Result<DatasetSummary, BootstrapError>) {
    match outcome {
        Ok(summary) => info!(
            "✅ Loaded and trained model for {} ({} observations through {}, {})",
            key, summary.observations, summary.anchor_date, summary.model
        ),
        Err(e) => error!("❌ Failed to load model for {}: {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{EngineError, LoadError};
    use crate::services::ets_engine::AutoEtsEngine;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> DatasetConfig {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        DatasetConfig::new(path)
    }

    fn csv_rows(days: u32) -> String {
        let mut out = String::from("Date,Close/Last\n");
        for d in 1..=days {
            out.push_str(&format!("01/{:02}/2024,\"$1,{:03}.50\"\n", d, 100 + d));
        }
        out
    }

    #[test]
    fn test_failures_are_isolated() {
        let dir = TempDir::new().unwrap();
        let mut datasets = BTreeMap::new();
        datasets.insert("nasdaq".to_string(), write(dir.path(), "nasdaq.csv", &csv_rows(20)));
        datasets.insert("snp".to_string(), write(dir.path(), "snp.csv", "Date,Close/Last\nbad,bad\n"));
        datasets.insert("dow".to_string(), DatasetConfig::new(dir.path().join("missing.csv")));
        datasets.insert("russell".to_string(), write(dir.path(), "rut.csv", &csv_rows(2)));

        let report = bootstrap(&datasets, &AutoEtsEngine::new(), &FitOptions::default());

        assert_eq!(report.loaded(), vec!["nasdaq"]);
        assert_eq!(report.failed(), vec!["dow", "russell", "snp"]);
        assert_eq!(report.cache.keys(), vec!["nasdaq"]);

        let outcome = |key: &str| report.outcomes.iter().find(|o| o.key == key).unwrap();
        assert!(matches!(
            outcome("dow").outcome,
            Err(BootstrapError::Load(LoadError::NotFound(_)))
        ));
        assert!(matches!(
            outcome("snp").outcome,
            Err(BootstrapError::Load(LoadError::Empty(_)))
        ));
        match &outcome("russell").outcome {
            Err(BootstrapError::Train(e)) => {
                assert_eq!(e.index, "russell");
                assert_eq!(e.cause, EngineError::InsufficientData { required: 3, actual: 2 });
            }
            other => panic!("expected a training failure, got {:?}", other),
        }

        // failed keys are absent from both maps
        for key in ["dow", "russell", "snp"] {
            assert!(!report.cache.models().contains(key));
            assert!(report.cache.archive().get(key).is_none());
        }
    }

    #[test]
    fn test_summary_reports_anchor_date() {
        let dir = TempDir::new().unwrap();
        let mut datasets = BTreeMap::new();
        datasets.insert("nasdaq".to_string(), write(dir.path(), "nasdaq.csv", &csv_rows(15)));

        let report = bootstrap(&datasets, &AutoEtsEngine::new(), &FitOptions::default());
        let summary = report.outcomes[0].outcome.as_ref().unwrap();

        assert_eq!(summary.observations, 15);
        assert_eq!(summary.anchor_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(summary.model.starts_with("ETS("));
    }
}
