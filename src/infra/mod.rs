// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several layers:
//
//   config.rs       — YAML configuration, loaded once per process
//                     and passed by reference to each use case.
//
//   logging.rs      — tracing subscriber: stderr plus a daily
//                     log file under logs/.
//
//   model_store.rs  — gzip + MessagePack model files named after
//                     their validation RMSE.
//
//   tracker.rs      — file-backed experiment tracking (params,
//                     metrics, artifacts per run).
//
//   metrics.rs      — runs.csv, one summary row per tracked run.

/// Typed YAML configuration
pub mod config;

/// Global tracing subscriber setup
pub mod logging;

/// Model persistence
pub mod model_store;

/// Experiment tracking
pub mod tracker;

/// Per-run summary CSV
pub mod metrics;
