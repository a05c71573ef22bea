//! File-based tracing setup
//!
//! The terminal is owned by the TUI, so log output goes to a file. Without
//! a log file nothing is initialized and tracing calls are no-ops.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Initialize tracing to append to `path`.
///
/// The filter comes from `RUST_LOG`, defaulting to `info` with debug-level
/// action logging for this crate.
pub fn init(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,medcheck=debug,medcheck_core=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
