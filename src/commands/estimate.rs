use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the estimate command
///
/// Computes one price with the same estimator the HTTP API uses
pub fn execute(config_path: &Path, location: &str, sqft: f64, bhk: i64, bath: i64) -> Result<()> {
    let (_, store) = super::load_store(config_path)?;
    let estimator = store.current();

    if estimator.location_index(location).is_none() {
        println!(
            "{} unknown location '{}', estimating without a location",
            "warning:".yellow(),
            location
        );
    }

    let price = estimator
        .estimate(location, sqft, bhk, bath)
        .context("Estimation failed")?;

    info!(location, total_sqft = sqft, bhk, bath, estimated_price = price, "Estimated price");
    println!(
        "{}: {} lakh",
        "Estimated price".cyan(),
        format!("{:.2}", price).bold()
    );

    Ok(())
}
