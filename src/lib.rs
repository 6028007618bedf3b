//! In-memory cache of per-index forecasting models and the smoothed forecast
//! query served from it.

pub mod app;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
