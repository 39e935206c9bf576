// ============================================================
// Layer 6 — Run Summary Log
// ============================================================
// Appends one row per tracked training run to a CSV file so
// runs can be compared side by side.
//
// Output file: <tracking_dir>/runs.csv
//
// Example:
//   run_id,started_at,finished_at,experiment,rmse,n_metrics,n_artifacts
//   8c1f...,2026-10-18T09:12:03Z,2026-10-18T09:12:09Z,grid-demand,3.412,2,2
//
// The header is written only when the file is new; later runs
// append below it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

pub const RUNS_FILE: &str = "runs.csv";

const HEADER: [&str; 7] = [
    "run_id",
    "started_at",
    "finished_at",
    "experiment",
    "rmse",
    "n_metrics",
    "n_artifacts",
];

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id:      String,
    pub started_at:  String,
    pub finished_at: String,
    pub experiment:  String,
    /// Empty when the run never logged an rmse
    pub rmse:        Option<f64>,
    pub n_metrics:   usize,
    pub n_artifacts: usize,
}

pub struct RunLog {
    csv_path: PathBuf,
}

impl RunLog {
    /// Create the directory and, for a new file, the header row.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create tracking directory '{}'", dir.display()))?;

        let csv_path = dir.join(RUNS_FILE);
        if !csv_path.exists() {
            let mut wtr = csv::Writer::from_path(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            wtr.write_record(HEADER)?;
            wtr.flush()?;
            tracing::debug!("Created run log: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn append(&self, summary: &RunSummary) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}' for appending", self.csv_path.display()))?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.serialize(summary)?;
        wtr.flush()?;

        tracing::debug!("Logged run {} to '{}'", summary.run_id, self.csv_path.display());
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<RunSummary>> {
        let mut rdr = csv::Reader::from_path(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;
        let rows = rdr.deserialize::<RunSummary>().collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, rmse: Option<f64>) -> RunSummary {
        RunSummary {
            run_id:      id.to_string(),
            started_at:  "2026-10-18T09:00:00Z".to_string(),
            finished_at: "2026-10-18T09:00:05Z".to_string(),
            experiment:  "grid-demand".to_string(),
            rmse,
            n_metrics:   1,
            n_artifacts: 2,
        }
    }

    #[test]
    fn test_runs_append_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        RunLog::new(dir.path()).unwrap().append(&summary("a", Some(3.5))).unwrap();
        let log = RunLog::new(dir.path()).unwrap();
        log.append(&summary("b", None)).unwrap();

        let rows = log.read_all().unwrap();
        assert_eq!(rows, vec![summary("a", Some(3.5)), summary("b", None)]);

        let text = fs::read_to_string(log.csv_path()).unwrap();
        assert_eq!(text.matches("run_id").count(), 1);
    }
}
