use anyhow::Result;
use colored::Colorize;
use home_price_estimator::server;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

use crate::pid::PidFile;

/// Execute the start command
///
/// This will:
/// 1. Load configuration
/// 2. Load the schema and model artifacts (failure aborts startup)
/// 3. Create PID file
/// 4. Start the server
pub async fn execute(config_path: &Path, pid_file: Option<PathBuf>) -> Result<()> {
    println!("{}", "Starting home price estimator...".green());

    let (cfg, store) = super::load_store(config_path)?;

    let estimator = store.current();
    println!(
        "  {}: {} locations, {} columns",
        "Artifacts".cyan(),
        estimator.locations().len(),
        estimator.data_columns().len()
    );
    println!(
        "  {}: http://{}:{}",
        "Listening".cyan(),
        cfg.server.host,
        cfg.server.port
    );
    info!("Starting home price estimator in foreground mode");

    let _pid_file = PidFile::create(pid_file)?;

    // Blocks until shutdown
    server::start_server(cfg, Arc::new(store)).await?;

    Ok(())
}
