// ============================================================
// Layer 6 — Experiment Tracking
// ============================================================
// File-backed implementation of ExperimentTracker.
//
// Layout under the tracking directory:
//
//   mlruns/
//     runs.csv                        one summary row per run
//     grid-demand/                    experiment name
//       3f2a9c.../                    run id (uuid v4)
//         params.json                 {"n_estimators": "100", ...}
//         metrics.json                {"rmse": 3.41}
//         artifacts.json              ["models/model_3.mpk.gz", ...]
//
// The JSON files are rewritten on every log call, so an
// interrupted run still leaves what it logged so far.
//
// Tracking never decides whether a run succeeds: callers go
// through `best_effort`, which downgrades failures to warnings.

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::domain::traits::ExperimentTracker;
use crate::infra::metrics::{RunLog, RunSummary};

/// Log a tracker failure and carry on.
pub fn best_effort(action: &str, result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!("Experiment tracking: {action} failed: {e:#}");
    }
}

/// Pick the tracker the configuration asks for.
pub fn tracker_for(tracking_dir: Option<&Path>) -> Box<dyn ExperimentTracker> {
    match tracking_dir {
        Some(dir) => Box::new(FileTracker::new(dir)),
        None => {
            tracing::debug!("No tracking_dir configured; experiment tracking disabled");
            Box::new(NoopTracker)
        }
    }
}

// ─── FileTracker ─────────────────────────────────────────────────────────────
pub struct FileTracker {
    root: PathBuf,
    run:  Option<ActiveRun>,
}

struct ActiveRun {
    id:         String,
    experiment: String,
    dir:        PathBuf,
    started_at: String,
    params:     BTreeMap<String, String>,
    metrics:    BTreeMap<String, f64>,
    artifacts:  Vec<String>,
}

impl FileTracker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), run: None }
    }

    /// Directory of the active run, if any
    pub fn run_dir(&self) -> Option<&Path> {
        self.run.as_ref().map(|r| r.dir.as_path())
    }

    fn active(&mut self) -> Result<&mut ActiveRun> {
        match self.run.as_mut() {
            Some(run) => Ok(run),
            None      => bail!("no active run; call start_run first"),
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))
}

impl ExperimentTracker for FileTracker {
    fn start_run(&mut self, experiment: &str) -> Result<String> {
        if let Some(run) = &self.run {
            bail!("run {} is still active", run.id);
        }

        let id  = uuid::Uuid::new_v4().to_string();
        let dir = self.root.join(experiment).join(&id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create run directory '{}'", dir.display()))?;

        tracing::info!("Tracking run {id} under '{}'", dir.display());
        self.run = Some(ActiveRun {
            id:         id.clone(),
            experiment: experiment.to_string(),
            dir,
            started_at: now(),
            params:     BTreeMap::new(),
            metrics:    BTreeMap::new(),
            artifacts:  Vec::new(),
        });
        Ok(id)
    }

    fn log_params(&mut self, params: &BTreeMap<String, String>) -> Result<()> {
        let run = self.active()?;
        run.params.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        write_json(&run.dir.join("params.json"), &run.params)
    }

    fn log_metric(&mut self, name: &str, value: f64) -> Result<()> {
        let run = self.active()?;
        run.metrics.insert(name.to_string(), value);
        write_json(&run.dir.join("metrics.json"), &run.metrics)
    }

    fn log_artifact(&mut self, path: &Path) -> Result<()> {
        let run = self.active()?;
        run.artifacts.push(path.display().to_string());
        write_json(&run.dir.join("artifacts.json"), &run.artifacts)
    }

    fn end_run(&mut self) -> Result<()> {
        let Some(run) = self.run.take() else {
            bail!("no active run to end");
        };

        let summary = RunSummary {
            run_id:      run.id,
            started_at:  run.started_at,
            finished_at: now(),
            experiment:  run.experiment,
            rmse:        run.metrics.get("rmse").copied(),
            n_metrics:   run.metrics.len(),
            n_artifacts: run.artifacts.len(),
        };
        RunLog::new(&self.root)?.append(&summary)
    }
}

// ─── NoopTracker ─────────────────────────────────────────────────────────────
/// Accepts everything, records nothing.
pub struct NoopTracker;

impl ExperimentTracker for NoopTracker {
    fn start_run(&mut self, _experiment: &str) -> Result<String> {
        Ok(String::new())
    }

    fn log_params(&mut self, _params: &BTreeMap<String, String>) -> Result<()> {
        Ok(())
    }

    fn log_metric(&mut self, _name: &str, _value: f64) -> Result<()> {
        Ok(())
    }

    fn log_artifact(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn end_run(&mut self) -> Result<()> {
        Ok(())
    }
}
