// ============================================================
// Layer 2 — ProcessUseCase
// ============================================================
// Raw partitions in, processed partitions out. For each of
// train, test and validation:
//
//   load raw CSV → sort + shift + calendar fields → write processed CSV

use anyhow::Result;

use crate::data::{feature_engineer::FeatureEngineer, partition_store::PartitionStore};
use crate::domain::observation::PartitionKind;
use crate::infra::config::AppConfig;

pub struct ProcessUseCase<'a> {
    config: &'a AppConfig,
}

impl<'a> ProcessUseCase<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let store    = PartitionStore::new(&self.config.data_ingestion.artifact_dir);
        let engineer = FeatureEngineer::new(self.config.data_processing.shift);
        tracing::info!(
            "Data processing started (shift {} → effective {}h)",
            self.config.data_processing.shift,
            engineer.effective_shift(),
        );

        for kind in PartitionKind::ALL {
            let raw  = store.load_raw(kind)?;
            let rows = engineer.transform(&raw);
            store.save_processed(kind, &rows)?;
            tracing::info!("Processed {} {} rows", rows.len(), kind);
        }

        tracing::info!("Data processing completed: '{}'", store.processed_dir().display());
        Ok(())
    }
}
