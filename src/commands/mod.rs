//! Command implementations for the CLI
//!
//! - start: Start the estimator server
//! - stop: Stop a running instance
//! - reload: Reload model artifacts
//! - test: Check configuration and artifacts
//! - config: Configuration display and validation
//! - locations: List known locations
//! - estimate: One-off price estimate

pub mod config;
pub mod estimate;
pub mod locations;
pub mod reload;
pub mod start;
pub mod stop;

use anyhow::{Context, Result};
use std::path::Path;

use home_price_estimator::{
    artifacts::ArtifactStore,
    config::{self as app_config, Config},
};

/// Load configuration and the artifacts it points at
pub(crate) fn load_store(config_path: &Path) -> Result<(Config, ArtifactStore)> {
    let cfg = app_config::load_config(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let store = ArtifactStore::open(cfg.artifacts.clone())
        .context("Failed to load model artifacts")?;

    Ok((cfg, store))
}
