use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::models::{ForecastQuery, ForecastResponse, HorizonQuery};
use crate::services::forecast_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_forecast))
        .route("/:index", get(get_index_forecast))
}

/// GET /api/forecast?index=nasdaq&days=365
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Response {
    respond(&state, &query.index, query.days)
}

/// GET /api/forecast/:index?days=365
pub async fn get_index_forecast(
    Path(index): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<HorizonQuery>,
) -> Response {
    respond(&state, &index, query.days)
}

fn respond(state: &AppState, index: &str, days: usize) -> Response {
    tracing::info!("GET /api/forecast/{} - {} days", index, days);
    let result = forecast_service::forecast(&state.cache, index, days);
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("GET /api/forecast/{} - {}", index, e);
            e.status_code()
        }
    };
    (status, Json(ForecastResponse::from(result))).into_response()
}
