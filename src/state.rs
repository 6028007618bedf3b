use std::sync::Arc;
use crate::services::forecast_cache::ForecastCache;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ForecastCache>,
}
