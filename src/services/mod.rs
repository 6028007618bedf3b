//! Forecast cache services
//!
//! - `series_loader` - reads and cleans one raw CSV export
//! - `forecast_engine` - fit/predict capability boundary
//! - `ets_engine` - default automatic exponential smoothing engine
//! - `model_registry` / `series_archive` - per-index storage
//! - `forecast_cache` - owns both stores, built once at startup
//! - `bootstrap` - startup load-and-train run
//! - `forecast_service` - smoothed forecast queries

pub mod bootstrap;
pub mod ets_engine;
pub mod forecast_cache;
pub mod forecast_engine;
pub mod forecast_service;
pub mod model_registry;
pub mod series_archive;
pub mod series_loader;
