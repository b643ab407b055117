//! File logging
//!
//! A TUI owns the terminal, so diagnostics go to `bibr.log` inside the
//! library folder instead of stdout. The filter comes from `RUST_LOG` when
//! set, otherwise from the configured directive.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `<dir>/bibr.log`.
///
/// The returned guard must stay alive for the life of the process; dropping
/// it flushes and stops the background writer.
///
/// # Errors
///
/// Returns an error when the log directory cannot be created.
pub fn init(dir: &Path, filter: &str) -> io::Result<WorkerGuard> {
    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, "bibr.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
