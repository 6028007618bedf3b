use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::errors::ConfigError;
use crate::models::IndexKey;

/// Trading days per year, the seasonal period handed to the engine
pub const DEFAULT_SEASON_LENGTH: usize = 252;

/// Column names of the raw CSV mapped onto the canonical date/value fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMap {
    pub date: String,
    pub value: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            value: "Close/Last".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub column_map: Option<ColumnMap>,
}

impl DatasetConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            column_map: None,
        }
    }

    pub fn with_column_map(mut self, column_map: ColumnMap) -> Self {
        self.column_map = Some(column_map);
        self
    }

    pub fn columns(&self) -> ColumnMap {
        self.column_map.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub datasets: BTreeMap<IndexKey, DatasetConfig>,
    pub season_length: usize,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let datasets = match std::env::var("DATASETS_CONFIG") {
            Ok(path) => load_datasets_file(Path::new(&path))?,
            Err(_) => {
                let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
                default_datasets(Path::new(&data_dir))
            }
        };

        let season_length = std::env::var("SEASON_LENGTH")
            .ok()
            .and_then(|raw| match raw.parse::<usize>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring invalid SEASON_LENGTH={}, using {}", raw, DEFAULT_SEASON_LENGTH);
                    None
                }
            })
            .unwrap_or(DEFAULT_SEASON_LENGTH);

        let bind_addr = std::env::var("BIND_ADDR")
            .ok()
            .and_then(|raw| match raw.parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!("Ignoring invalid BIND_ADDR={}", raw);
                    None
                }
            })
            .unwrap_or_else(default_bind_addr);

        let config = Self {
            datasets,
            season_length,
            bind_addr,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasets.is_empty() {
            return Err(ConfigError::Invalid("no datasets configured".to_string()));
        }
        if self.season_length < 2 {
            return Err(ConfigError::Invalid(format!(
                "season length must be at least 2, got {}",
                self.season_length
            )));
        }
        Ok(())
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

/// The four tracked US indices and their CSV exports
pub fn default_datasets(data_dir: &Path) -> BTreeMap<IndexKey, DatasetConfig> {
    [
        ("nasdaq", "nasdaq.csv"),
        ("snp", "snp.csv"),
        ("dow", "downjones.csv"),
        ("russell", "rut.csv"),
    ]
    .into_iter()
    .map(|(key, file)| (key.to_string(), DatasetConfig::new(data_dir.join(file))))
    .collect()
}

/// Read a JSON object of `{"<index>": {"path": ..., "column_map": {...}}}`
pub fn load_datasets_file(path: &Path) -> Result<BTreeMap<IndexKey, DatasetConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_datasets(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_datasets(raw: &str) -> Result<BTreeMap<IndexKey, DatasetConfig>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_datasets() {
        let datasets = default_datasets(Path::new("data"));
        assert_eq!(datasets.len(), 4);
        assert_eq!(datasets["dow"].path, PathBuf::from("data/downjones.csv"));
        assert_eq!(datasets["russell"].path, PathBuf::from("data/rut.csv"));
        assert_eq!(datasets["nasdaq"].columns(), ColumnMap::default());
    }

    #[test]
    fn test_parse_datasets_with_column_map() {
        let raw = r#"{
            "nasdaq": {"path": "data/nasdaq.csv"},
            "ftse": {"path": "data/ftse.csv", "column_map": {"date": "Day", "value": "Price"}}
        }"#;
        let datasets = parse_datasets(raw).unwrap();

        assert_eq!(datasets["nasdaq"].column_map, None);
        let ftse = datasets["ftse"].columns();
        assert_eq!(ftse.date, "Day");
        assert_eq!(ftse.value, "Price");
    }

    #[test]
    fn test_validate_rejects_empty_and_short_season() {
        let mut config = AppConfig {
            datasets: BTreeMap::new(),
            season_length: DEFAULT_SEASON_LENGTH,
            bind_addr: default_bind_addr(),
        };
        assert!(config.validate().is_err());

        config.datasets = default_datasets(Path::new("data"));
        config.season_length = 1;
        assert!(config.validate().is_err());

        config.season_length = 252;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_config_file_is_read_error() {
        let err = load_datasets_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
