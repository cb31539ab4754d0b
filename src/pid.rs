use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use home_price_estimator::signals::is_process_running;

/// PID file holding an exclusive lock for the lifetime of the server
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    file: File,
}

impl PidFile {
    /// Create and lock a PID file
    ///
    /// A lock held by a process that is no longer running is taken over.
    pub fn create(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(Self::default_pid_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create PID file directory: {}", parent.display())
                })?;
            }
        }

        // Not truncated on open: the old PID is needed if the lock is taken
        #[allow(clippy::suspicious_open_options)]
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("Failed to open PID file: {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            let old_pid = Self::read_pid_from_file(&mut file)
                .context("Failed to read PID from locked file")?;

            if is_process_running(old_pid) {
                bail!(
                    "Server already running (PID: {}). Use 'home-price stop' first.",
                    old_pid
                );
            }

            warn!(old_pid, "Taking over stale PID file");
            file.lock_exclusive()
                .context("Failed to acquire lock even after detecting stale PID")?;
        }
        info!("Acquired PID file lock: {}", path.display());

        let pid = std::process::id();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", pid)?;
        file.flush()?;

        Ok(PidFile { path, file })
    }

    /// Read PID from an existing PID file (for stop/reload commands)
    pub fn read(path: Option<PathBuf>) -> Result<u32> {
        let path = path.unwrap_or_else(Self::default_pid_path);

        if !path.exists() {
            bail!(
                "PID file not found: {}. Is the server running?",
                path.display()
            );
        }

        let mut file = File::open(&path)
            .with_context(|| format!("Failed to open PID file: {}", path.display()))?;

        Self::read_pid_from_file(&mut file)
    }

    fn read_pid_from_file(file: &mut File) -> Result<u32> {
        file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        contents
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid PID in file: '{}'", contents.trim()))
    }

    /// `./run/home-price.pid` when `./run` is usable, else `./home-price.pid`
    fn default_pid_path() -> PathBuf {
        let run_dir = Path::new("./run");
        if run_dir.is_dir() || std::fs::create_dir_all(run_dir).is_ok() {
            return run_dir.join("home-price.pid");
        }
        PathBuf::from("./home-price.pid")
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to unlock PID file: {}", e);
        }

        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove PID file {}: {}", self.path.display(), e);
        } else {
            info!("PID file removed: {}", self.path.display());
        }
    }
}
