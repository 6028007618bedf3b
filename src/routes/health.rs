use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    indices_loaded: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    info!("GET /health - Health check");
    Json(HealthResponse {
        status: "OK",
        indices_loaded: state.cache.len(),
    })
}
