//! File-backed tracing setup.
//!
//! The TUI owns stdout, so log output goes to a daily-rotated file under
//! the platform data directory (overridable with `IMPORTDASH_LOG_DIR`).
//! `RUST_LOG` takes precedence over the `--log-level` flag.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn log_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("IMPORTDASH_LOG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::data_local_dir().map(|dir| dir.join("importdash").join("logs"))
}

/// Install the global subscriber. Returns the appender guard, which must be
/// kept alive for the lifetime of the process; `None` means no usable log
/// directory was found and logging stays disabled.
pub(crate) fn init(default_filter: &str) -> Option<WorkerGuard> {
    let dir = log_dir()?;
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, "importdash.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
