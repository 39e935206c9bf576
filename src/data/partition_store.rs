// ============================================================
// Layer 4 — Partition Store (CSV tables)
// ============================================================
// Writes partitions as comma-delimited tables and reads them
// back for the next stage.
//
// Layout under the artifact directory:
//
//   artifacts/
//     train_data.csv                 time,row,column,value
//     test_data.csv
//     validation_data.csv
//     processed_data/
//       processed_train_data.csv     ...,hour_of_day,day_of_week
//       processed_test_data.csv
//       processed_validation_data.csv
//     predictions/
//       test_predictions.csv         time,row,column,demand
//
// The header is always written, even for an empty partition,
// so a reader can tell "no rows" apart from "wrong file".
// Writes are not atomic: a crash mid-write leaves a partial file.
//
// Reference: csv crate documentation (serde support)

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::error::PipelineError;
use crate::domain::features::{FeatureRow, ForecastRow};
use crate::domain::observation::{Observation, PartitionKind};

// ─── TableRow ────────────────────────────────────────────────────────────────
/// A record type with a fixed CSV header.
pub trait TableRow: Serialize + DeserializeOwned {
    const HEADER: &'static [&'static str];
}

impl TableRow for Observation {
    const HEADER: &'static [&'static str] = &["time", "row", "column", "value"];
}

impl TableRow for FeatureRow {
    const HEADER: &'static [&'static str] =
        &["time", "row", "column", "value", "hour_of_day", "day_of_week"];
}

impl TableRow for ForecastRow {
    const HEADER: &'static [&'static str] = &["time", "row", "column", "demand"];
}

// ─── PartitionStore ──────────────────────────────────────────────────────────
pub struct PartitionStore {
    root: PathBuf,
}

impl PartitionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_path(&self, kind: PartitionKind) -> PathBuf {
        self.root.join(format!("{}_data.csv", kind.stem()))
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed_data")
    }

    pub fn processed_path(&self, kind: PartitionKind) -> PathBuf {
        self.processed_dir()
            .join(format!("processed_{}_data.csv", kind.stem()))
    }

    pub fn predictions_path(&self) -> PathBuf {
        self.root.join("predictions").join("test_predictions.csv")
    }

    pub fn save_raw(&self, kind: PartitionKind, rows: &[Observation]) -> Result<PathBuf> {
        let path = self.raw_path(kind);
        write_table(&path, rows)?;
        tracing::debug!("Wrote {} {} rows to '{}'", rows.len(), kind, path.display());
        Ok(path)
    }

    pub fn load_raw(&self, kind: PartitionKind) -> Result<Vec<Observation>> {
        read_table(&self.raw_path(kind))
    }

    pub fn save_processed(&self, kind: PartitionKind, rows: &[FeatureRow]) -> Result<PathBuf> {
        let path = self.processed_path(kind);
        write_table(&path, rows)?;
        tracing::debug!("Wrote {} processed {} rows to '{}'", rows.len(), kind, path.display());
        Ok(path)
    }

    pub fn load_processed(&self, kind: PartitionKind) -> Result<Vec<FeatureRow>> {
        read_table(&self.processed_path(kind))
    }

    pub fn save_predictions(&self, rows: &[ForecastRow]) -> Result<PathBuf> {
        let path = self.predictions_path();
        write_table(&path, rows)?;
        Ok(path)
    }
}

/// Write `rows` under `T::HEADER`, creating parent directories.
pub fn write_table<T: TableRow>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Cannot open '{}' for writing", path.display()))?;

    wtr.write_record(T::HEADER)?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Cannot write row to '{}'", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("Cannot flush '{}'", path.display()))?;
    Ok(())
}

/// Read every row of a table, checking that all header columns are present.
pub fn read_table<T: TableRow>(path: &Path) -> Result<Vec<T>> {
    if !path.is_file() {
        return Err(PipelineError::not_found("partition table", path).into());
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    let headers = rdr.headers()?.clone();
    for column in T::HEADER {
        if !headers.iter().any(|h| h == *column) {
            return Err(PipelineError::Format(format!(
                "'{}' is missing column '{}'",
                path.display(),
                column
            ))
            .into());
        }
    }

    let mut rows = Vec::new();
    for (i, record) in rdr.deserialize::<T>().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let row: T = record
            .with_context(|| format!("Bad record at line {} of '{}'", i + 2, path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}
