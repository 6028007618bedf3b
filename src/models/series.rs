use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a tracked market index (e.g. "nasdaq").
pub type IndexKey = String;

/// One cleaned historical observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Cleaned, deduplicated, date-ascending observations for one index.
///
/// A `Series` is never empty; `from_sorted` refuses an empty vector so the
/// anchor date is always available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    points: Vec<ObservationPoint>,
}

impl Series {
    /// Build a series from points already sorted by date without duplicates.
    /// Returns `None` for an empty input.
    pub fn from_sorted(points: Vec<ObservationPoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Some(Self { points })
    }

    pub fn points(&self) -> &[ObservationPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    /// Last observed date, the anchor for forecast dates.
    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(y: i32, m: u32, d: u32, value: f64) -> ObservationPoint {
        ObservationPoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            value,
        }
    }

    #[test]
    fn test_empty_series_is_rejected() {
        assert!(Series::from_sorted(Vec::new()).is_none());
    }

    #[test]
    fn test_first_and_last_dates() {
        let series = Series::from_sorted(vec![
            point(2024, 1, 8, 1.0),
            point(2024, 1, 9, 2.0),
            point(2024, 1, 10, 3.0),
        ])
        .unwrap();

        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
    }
}
