pub mod forecast;
mod series;

pub use forecast::{
    round_2dp, ForecastPoint, ForecastQuery, ForecastResponse, HorizonQuery, IndexSummary,
    DEFAULT_HORIZON_DAYS, DEFAULT_INDEX,
};
pub use series::{IndexKey, ObservationPoint, Series};
