// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to these traits rather than to
// concrete loaders and trackers:
//   - GridFileSource implements ObservationSource
//   - FileTracker / NoopTracker implement ExperimentTracker

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::observation::ParsedGrid;

// ─── ObservationSource ───────────────────────────────────────────────────────
/// Anything that can produce a decoded grid.
///
/// Implementations:
///   - GridFileSource → reads the plain-text snapshot format
pub trait ObservationSource {
    fn load(&self) -> Result<ParsedGrid>;
}

// ─── ExperimentTracker ───────────────────────────────────────────────────────
/// Records the parameters, metrics and artifacts of a training run.
///
/// Tracking is best-effort: the trainer logs failures from these
/// calls and carries on.
pub trait ExperimentTracker {
    /// Open a new run and return its id
    fn start_run(&mut self, experiment: &str) -> Result<String>;

    fn log_params(&mut self, params: &BTreeMap<String, String>) -> Result<()>;

    fn log_metric(&mut self, name: &str, value: f64) -> Result<()>;

    fn log_artifact(&mut self, path: &Path) -> Result<()>;

    /// Flush and close the current run
    fn end_run(&mut self) -> Result<()>;
}
