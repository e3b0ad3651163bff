//! Tracing setup. The terminal belongs to the TUI while a session runs, so
//! logs only ever go to a file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log file path, used when `--log-file` is not given
pub const LOG_ENV: &str = "IMGSORT_LOG";

const DEFAULT_FILTER: &str = "info";

/// Picks the log file: the CLI value, else `$IMGSORT_LOG`
pub fn log_path(cli: Option<&Path>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_ENV).map(PathBuf::from))
        .filter(|p| !p.as_os_str().is_empty())
}

/// Builds the filter from `--log-level`, else `RUST_LOG`, else `info`
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Installs a file subscriber. Without a log path nothing is installed and
/// the `tracing` macros are no-ops.
pub fn init_tracing(log_file: Option<&Path>, level: Option<&str>) -> std::io::Result<()> {
    let Some(path) = log_path(log_file) else {
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .try_init();

    tracing::info!(path = %path.display(), version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_log_path_wins() {
        let path = log_path(Some(Path::new("/tmp/imgsort.log")));
        assert_eq!(path, Some(PathBuf::from("/tmp/imgsort.log")));
    }

    #[test]
    fn test_explicit_level_filter() {
        let filter = build_filter(Some("debug"));
        assert_eq!(filter.to_string(), "debug");
    }
}
