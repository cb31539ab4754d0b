//! HTTP request handlers

pub mod health;
pub mod locations;
pub mod metrics_handler;
pub mod predict;

use std::sync::Arc;

use crate::artifacts::ArtifactStore;

/// Application state shared by the API handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
}

impl AppState {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }
}
