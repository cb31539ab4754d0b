use anyhow::{bail, Result};
#[cfg(unix)]
use colored::Colorize;
use std::path::PathBuf;
#[cfg(unix)]
use std::time::{Duration, Instant};
#[cfg(unix)]
use tokio::time::sleep;
#[cfg(unix)]
use tracing::info;

#[cfg(unix)]
use crate::pid::PidFile;

#[cfg(unix)]
use home_price_estimator::signals::{is_process_running, send_signal_to_pid};
#[cfg(unix)]
use nix::libc;
#[cfg(unix)]
use tokio::signal::unix::SignalKind;

/// Execute the stop command
///
/// This will:
/// 1. Read PID from PID file
/// 2. Send SIGTERM to the process
/// 3. Wait for graceful shutdown (with timeout)
/// 4. Optionally force kill with SIGKILL
#[cfg(unix)]
pub async fn execute(pid_file: Option<PathBuf>, force: bool, timeout: u64) -> Result<()> {
    let pid = PidFile::read(pid_file)?;

    println!("{} {}", "Stopping server".yellow(), format!("(PID: {})", pid).cyan());
    send_signal_to_pid(pid, SignalKind::terminate())?;
    println!("  Sent SIGTERM, waiting for graceful shutdown...");

    let start = Instant::now();
    let timeout_duration = Duration::from_secs(timeout);

    while start.elapsed() < timeout_duration {
        if !is_process_running(pid) {
            println!("{}", "  Server stopped successfully".green());
            info!("Server stopped successfully");
            return Ok(());
        }
        sleep(Duration::from_millis(500)).await;
    }

    if !force {
        bail!(
            "Timeout after {} seconds. Use --force to kill immediately.",
            timeout
        );
    }

    println!("{}", "  Timeout reached, force killing...".red());
    send_signal_to_pid(pid, SignalKind::from_raw(libc::SIGKILL))?;
    sleep(Duration::from_secs(1)).await;

    if is_process_running(pid) {
        bail!("Failed to kill process even with SIGKILL");
    }

    println!("{}", "  Server force stopped".yellow());
    Ok(())
}

#[cfg(not(unix))]
pub async fn execute(_pid_file: Option<PathBuf>, _force: bool, _timeout: u64) -> Result<()> {
    bail!("Stop command is not supported on this platform")
}
