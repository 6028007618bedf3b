use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::models::IndexSummary;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_indices))
}

/// GET /api/indices - indices available for forecasting
async fn list_indices(State(state): State<AppState>) -> Json<Vec<IndexSummary>> {
    info!("GET /api/indices - Listing loaded indices");
    Json(state.cache.summaries())
}
