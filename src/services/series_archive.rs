use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{IndexKey, Series};

/// Cleaned source series per index, kept so forecasts can be anchored to the
/// last real observation.
#[derive(Debug, Default)]
pub struct SeriesArchive {
    series: HashMap<IndexKey, Series>,
}

impl SeriesArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: IndexKey, series: Series) {
        self.series.insert(key, series);
    }

    pub fn get(&self, key: &str) -> Option<&Series> {
        self.series.get(key)
    }

    pub fn anchor_date(&self, key: &str) -> Option<NaiveDate> {
        self.series.get(key).map(Series::last_date)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
