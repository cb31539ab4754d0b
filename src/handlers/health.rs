use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::handlers::AppState;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "home-price-estimator",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// The server only starts once artifacts are loaded, so this reports what is loaded
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let estimator = state.store.current();

    (StatusCode::OK, Json(json!({
        "status": "ready",
        "service": "home-price-estimator",
        "columns": estimator.data_columns().len(),
        "locations": estimator.locations().len(),
        "model_format_version": estimator.model().source_version(),
    })))
}
