// ============================================================
// Layer 6 — Logging Setup
// ============================================================
// Installs the global tracing subscriber with two sinks:
//   - stderr, human readable
//   - logs/log_<YYYY-MM-DD>.log, plain text, appended to
//
// Filtering: RUST_LOG wins when set; otherwise the -v count
// picks the level for this crate (info, debug, trace).

use std::{
    fs::{self, File, OpenOptions},
    path::Path,
    sync::Mutex,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_DIR: &str = "logs";

/// Install the global subscriber. Call once, at the top of main.
pub fn init(verbosity: u8, log_dir: &Path) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("grid_demand=info")),
        1 => EnvFilter::new("grid_demand=debug"),
        _ => EnvFilter::new("grid_demand=trace"),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file, file_err) = match open_log_file(log_dir) {
        Ok(f)  => (Some(f), None),
        Err(e) => (None, Some(e)),
    };
    let file_layer = file.map(|f| {
        fmt::layer()
            .with_writer(Mutex::new(f))
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_err {
        tracing::warn!("Logging to stderr only; cannot open log file in '{}': {e}", log_dir.display());
    }
}

/// Name of today's log file, e.g. `log_2026-10-18.log`
pub fn log_file_name() -> String {
    format!("log_{}.log", chrono::Local::now().format("%Y-%m-%d"))
}

fn open_log_file(log_dir: &Path) -> std::io::Result<File> {
    fs::create_dir_all(log_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(log_file_name()))
}
