use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::path::Path;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "workflo";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory: {0}")]
    DirectoryError(String),
    #[error("Failed to start logger: {0}")]
    StartError(String),
}

/// Start rotating file logging under `log_dir`.
///
/// The TUI owns stdout (alternate screen), so everything goes to files.
/// The returned handle must stay alive for the duration of the process.
pub fn init(log_dir: &Path) -> Result<LoggerHandle, LoggingError> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| LoggingError::DirectoryError(e.to_string()))?;

    let handle = Logger::try_with_env_or_str(default_level())
        .map_err(|e| LoggingError::StartError(e.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()
        .map_err(|e| LoggingError::StartError(e.to_string()))?;

    log::info!(
        "workflo {} started, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    Ok(handle)
}

fn default_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}
