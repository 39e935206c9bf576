// ============================================================
// Layer 2 — IngestUseCase
// ============================================================
// Turns the raw grid file into three raw partitions:
//
//   Step 1: Check the data source kind     (Layer 6 - infra)
//   Step 2: Decode the grid file           (Layer 4 - data)
//   Step 3: Seeded train/validation split  (Layer 4 - data)
//   Step 4: Write train/test/validation    (Layer 4 - data)
//
// The test partition is exactly the sentinel cells; it is
// not drawn from the known cells and test_ratio plays no part.

use anyhow::Result;

use crate::data::{
    grid_parser::GridFileSource,
    partition_store::PartitionStore,
    splitter::split_train_val,
};
use crate::domain::observation::PartitionKind;
use crate::domain::traits::ObservationSource;
use crate::infra::config::{AppConfig, DataSourceKind};

/// Row counts written by one ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub train:      usize,
    pub validation: usize,
    pub test:       usize,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.train + self.validation + self.test
    }
}

pub struct IngestUseCase<'a> {
    config: &'a AppConfig,
}

impl<'a> IngestUseCase<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Read from the configured source and write the partitions.
    pub fn execute(&self) -> Result<IngestReport> {
        let ing = &self.config.data_ingestion;
        let source = match ing.source_kind()? {
            DataSourceKind::Local => GridFileSource::new(&ing.source),
        };
        self.execute_with(&source)
    }

    /// Same as `execute`, with the observation source supplied by the caller.
    pub fn execute_with(&self, source: &dyn ObservationSource) -> Result<IngestReport> {
        let ing = &self.config.data_ingestion;
        tracing::info!("Data ingestion started");

        let grid = source.load()?;

        let (train, validation) = split_train_val(grid.known, ing.train_ratio, ing.seed);
        tracing::info!(
            "Split {} known cells with ratio {} (seed {}): {} train, {} validation",
            train.len() + validation.len(),
            ing.train_ratio,
            ing.seed,
            train.len(),
            validation.len(),
        );

        let store = PartitionStore::new(&ing.artifact_dir);
        store.save_raw(PartitionKind::Train,      &train)?;
        store.save_raw(PartitionKind::Test,       &grid.unknown)?;
        store.save_raw(PartitionKind::Validation, &validation)?;

        let report = IngestReport {
            train:      train.len(),
            validation: validation.len(),
            test:       grid.unknown.len(),
        };
        tracing::info!(
            "Data ingestion completed: partitions written to '{}'",
            store.root().display()
        );
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use crate::domain::observation::Observation;
    use crate::test_helpers::{sample_config, TINY_GRID};
    use std::collections::HashSet;
    use std::fs;

    #[test]
    fn test_tiny_grid_counts_are_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = sample_config(dir.path());
        let grid = dir.path().join("tiny.txt");
        fs::write(&grid, TINY_GRID).unwrap();
        cfg.data_ingestion.source      = grid;
        cfg.data_ingestion.train_ratio = 0.5;

        let report = IngestUseCase::new(&cfg).execute().unwrap();
        assert_eq!(report, IngestReport { train: 1, validation: 2, test: 1 });

        let store = PartitionStore::new(&cfg.data_ingestion.artifact_dir);
        assert_eq!(
            store.load_raw(PartitionKind::Test).unwrap(),
            vec![Observation::new(0, 0, 1, -1)]
        );

        let known: HashSet<Observation> = [PartitionKind::Train, PartitionKind::Validation]
            .into_iter()
            .flat_map(|k| store.load_raw(k).unwrap())
            .collect();
        let expected: HashSet<Observation> = [
            Observation::new(0, 0, 0, 5),
            Observation::new(0, 1, 0, 3),
            Observation::new(0, 1, 1, 7),
        ]
        .into_iter()
        .collect();
        assert_eq!(known, expected);
    }

    #[test]
    fn test_partitions_cover_every_cell_once() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = sample_config(dir.path());
        let report = IngestUseCase::new(&cfg).execute().unwrap();

        // 4 days x 24 snapshots x 2 x 2 cells
        assert_eq!(report.total(), 4 * 24 * 4);

        let store = PartitionStore::new(&cfg.data_ingestion.artifact_dir);
        let all: Vec<Observation> = PartitionKind::ALL
            .into_iter()
            .flat_map(|k| store.load_raw(k).unwrap())
            .collect();
        let unique: HashSet<(u32, u32, u32)> = all.iter().map(Observation::cell).collect();
        assert_eq!(unique.len(), all.len());
        assert!(store.load_raw(PartitionKind::Test).unwrap().iter().all(Observation::is_sentinel));
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let cfg_a = sample_config(a.path());
        let cfg_b = sample_config(b.path());
        IngestUseCase::new(&cfg_a).execute().unwrap();
        IngestUseCase::new(&cfg_b).execute().unwrap();

        let train_a = PartitionStore::new(&cfg_a.data_ingestion.artifact_dir)
            .load_raw(PartitionKind::Train)
            .unwrap();
        let train_b = PartitionStore::new(&cfg_b.data_ingestion.artifact_dir)
            .load_raw(PartitionKind::Train)
            .unwrap();
        assert_eq!(train_a, train_b);
    }

    #[test]
    fn test_unsupported_source_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = sample_config(dir.path());
        cfg.data_ingestion.data_source = "s3".to_string();

        let err = IngestUseCase::new(&cfg).execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::Format(_))));
    }

    #[test]
    fn test_missing_grid_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = sample_config(dir.path());
        cfg.data_ingestion.source = dir.path().join("nope.txt");

        let err = IngestUseCase::new(&cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::NotFound { .. })
        ));
    }
}
