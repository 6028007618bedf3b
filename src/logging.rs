//! Tracing subscriber setup
//!
//! Console output is always on. When built with the `loki` feature and
//! `LOKI_ENABLED=true`, events are also shipped to the Loki push endpoint
//! in `LOKI_URL`, labelled with the service name and environment.

use std::error::Error;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use crate::errors::ConfigError;

const DEFAULT_DIRECTIVES: &str = "info";
const DEFAULT_SERVICE: &str = "indexcast";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Where and how log batches are pushed to Loki
#[derive(Debug, Clone, PartialEq)]
pub struct LokiTarget {
    pub url: Url,
    pub service: String,
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info,indexcast_backend=debug`
    pub directives: String,
    pub loki: Option<LokiTarget>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directives: DEFAULT_DIRECTIVES.to_string(),
            loki: None,
        }
    }
}

impl LoggingConfig {
    /// Reads `RUST_LOG`, `LOKI_ENABLED`, `LOKI_URL`, `SERVICE_NAME` and
    /// `ENVIRONMENT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let directives = var("RUST_LOG").unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string());

        let enabled = var("LOKI_ENABLED")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !enabled {
            return Ok(Self { directives, loki: None });
        }

        let raw = var("LOKI_URL").ok_or_else(|| {
            ConfigError::Invalid("LOKI_ENABLED is true but LOKI_URL is not set".to_string())
        })?;
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::Invalid(format!("LOKI_URL {:?}: {}", raw, e)))?;

        Ok(Self {
            directives,
            loki: Some(LokiTarget {
                url,
                service: var("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
                environment: var("ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            }),
        })
    }
}

/// Parse the directives, falling back to `info` when they are malformed.
/// The parse error is handed back so it can be logged once a subscriber exists.
fn build_filter(directives: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directives) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_DIRECTIVES), Some(e.to_string())),
    }
}

#[cfg(feature = "loki")]
fn loki_layer(target: Option<&LokiTarget>) -> Result<Option<tracing_loki::Layer>, Box<dyn Error>> {
    let Some(target) = target else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", &target.service)?
        .label("environment", &target.environment)?
        .build_url(target.url.clone())?;
    tokio::spawn(task);

    Ok(Some(layer))
}

#[cfg(not(feature = "loki"))]
fn loki_layer(
    _target: Option<&LokiTarget>,
) -> Result<Option<tracing_subscriber::layer::Identity>, Box<dyn Error>> {
    Ok(None)
}

/// Install the global subscriber. Needs a Tokio runtime when a Loki target
/// is configured.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let (filter, rejected) = build_filter(&config.directives);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(loki_layer(config.loki.as_ref())?)
        .try_init()?;

    if let Some(reason) = rejected {
        tracing::warn!(
            "Ignoring RUST_LOG {:?} ({}), logging at {}",
            config.directives,
            reason,
            DEFAULT_DIRECTIVES
        );
    }
    match &config.loki {
        Some(target) if cfg!(feature = "loki") => {
            tracing::info!("✅ Shipping logs for {} to Loki at {}", target.service, target.url)
        }
        Some(_) => tracing::warn!("LOKI_ENABLED is set but this build has no loki feature"),
        None => tracing::info!("📊 Console logging initialized"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<LoggingConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LoggingConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_are_console_only() {
        assert_eq!(from_vars(&[]).unwrap(), LoggingConfig::default());
        assert_eq!(
            from_vars(&[("LOKI_ENABLED", "false"), ("LOKI_URL", "http://localhost:3100")])
                .unwrap()
                .loki,
            None
        );
    }

    #[test]
    fn test_loki_requires_valid_url() {
        let missing = from_vars(&[("LOKI_ENABLED", "true")]).unwrap_err();
        assert!(matches!(missing, ConfigError::Invalid(_)));

        let malformed = from_vars(&[("LOKI_ENABLED", "true"), ("LOKI_URL", "not a url")]).unwrap_err();
        assert!(malformed.to_string().contains("LOKI_URL"));
    }

    #[test]
    fn test_loki_target_labels() {
        let config = from_vars(&[
            ("LOKI_ENABLED", "TRUE"),
            ("LOKI_URL", "http://localhost:3100"),
            ("ENVIRONMENT", "staging"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();

        let target = config.loki.unwrap();
        assert_eq!(target.url.as_str(), "http://localhost:3100/");
        assert_eq!(target.service, "indexcast");
        assert_eq!(target.environment, "staging");
        assert_eq!(config.directives, "debug");
    }

    #[test]
    fn test_malformed_directives_fall_back() {
        let (_, rejected) = build_filter("info,indexcast_backend=debug");
        assert!(rejected.is_none());

        let (filter, rejected) = build_filter("indexcast_backend=loudest");
        assert!(rejected.is_some());
        assert_eq!(filter.to_string(), EnvFilter::new(DEFAULT_DIRECTIVES).to_string());
    }
}
