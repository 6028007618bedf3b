use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{forecast, health, indices};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/forecast", forecast::router())
        .nest("/api/indices", indices::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
