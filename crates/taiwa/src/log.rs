//! Logging for taiwa.
use anyhow::Context;
use std::io::LineWriter;
use std::path::Path;
use std::sync::Mutex;
use taiwa_core::get_data_dir;
use tracing_subscriber::fmt::time::OffsetTime;

const MAX_LOG_SIZE: u64 = 100 * 1024;

/// Initializes file based logging at `<data_dir>/taiwa.log`.
///
/// A log file larger than 100KB is moved to `taiwa.log.old` first. The data
/// directory honours `XDG_DATA_HOME`.
pub fn setup_logging() -> anyhow::Result<()> {
    let data_dir = get_data_dir().context("Failed to get data directory")?;
    let log_path = rotate_log(&data_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // Flush after every line
    let writer = Mutex::new(LineWriter::new(log_file));

    tracing_subscriber::fmt()
        .with_env_filter("taiwa=debug,taiwa_core=debug,rustyline=info")
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(OffsetTime::local_rfc_3339()?)
        .init();
    Ok(())
}

/// Returns the log path, moving an oversized log aside.
fn rotate_log(data_dir: &Path) -> std::io::Result<std::path::PathBuf> {
    let log_path = data_dir.join("taiwa.log");

    if log_path.exists() && std::fs::metadata(&log_path)?.len() > MAX_LOG_SIZE {
        let backup_path = data_dir.join("taiwa.log.old");
        if backup_path.exists() {
            std::fs::remove_file(&backup_path)?;
        }
        std::fs::rename(&log_path, backup_path)?;
    }

    Ok(log_path)
}
