use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{handlers::AppState, metrics};

pub const LOCATIONS_ENDPOINT: &str = "/api/get_location_names";

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<String>,
}

/// Handle /api/get_location_names
/// Returns the location columns of the loaded schema, in file order
pub async fn get_location_names(State(state): State<AppState>) -> Json<LocationsResponse> {
    let start = Instant::now();
    metrics::record_request(LOCATIONS_ENDPOINT);

    let estimator = state.store.current();
    let locations = estimator.locations().to_vec();

    tracing::debug!(count = locations.len(), "Serving location names");
    metrics::record_duration(LOCATIONS_ENDPOINT, start.elapsed());

    Json(LocationsResponse { locations })
}
