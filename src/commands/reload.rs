use anyhow::Result;
#[cfg(unix)]
use colored::Colorize;
use std::path::PathBuf;

#[cfg(unix)]
use crate::pid::PidFile;

#[cfg(unix)]
use home_price_estimator::signals::send_signal_to_pid;
#[cfg(unix)]
use tokio::signal::unix::SignalKind;

/// Execute the reload command
///
/// Sends SIGHUP to the running server, which re-reads the schema and model
/// artifacts. A failed reload leaves the server on its previous artifacts.
#[cfg(unix)]
pub async fn execute(pid_file: Option<PathBuf>) -> Result<()> {
    let pid = PidFile::read(pid_file)?;

    println!(
        "{} {}",
        "Reloading artifacts".yellow(),
        format!("(PID: {})", pid).cyan()
    );

    send_signal_to_pid(pid, SignalKind::hangup())?;

    println!("{}", "  Reload signal sent successfully".green());
    println!(
        "  {}",
        "Note: Check server logs to verify reload succeeded".dimmed()
    );
    tracing::info!("SIGHUP sent to PID {}", pid);

    Ok(())
}

#[cfg(not(unix))]
pub async fn execute(_pid_file: Option<PathBuf>) -> Result<()> {
    anyhow::bail!("Reload command is not supported on this platform")
}
