// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers, one use case per pipeline
// stage. The configuration is loaded once by the caller and
// borrowed by every use case.
//
// Rules for this layer:
//   - No model code or file formats here
//   - No printing (that's Layer 1)
//   - Only workflow coordination
//
//   ingest  → process → train
//   (raw)     (features) (model + forecast)

/// Grid file → raw partitions
pub mod ingest_use_case;

/// Raw partitions → feature tables
pub mod process_use_case;

/// Feature tables → model, metrics, forecast
pub mod train_use_case;

use anyhow::Result;

use crate::infra::config::AppConfig;
use ingest_use_case::IngestUseCase;
use process_use_case::ProcessUseCase;
use train_use_case::{TrainReport, TrainUseCase};

/// Run ingestion, processing and training in sequence.
/// The first failing stage aborts the rest.
pub fn run_pipeline(config: &AppConfig) -> Result<TrainReport> {
    let ingest = IngestUseCase::new(config).execute()?;
    tracing::info!(
        "Stage 1/3 done: {} train, {} validation, {} test",
        ingest.train,
        ingest.validation,
        ingest.test
    );

    ProcessUseCase::new(config).execute()?;
    tracing::info!("Stage 2/3 done");

    let report = TrainUseCase::new(config).execute()?;
    tracing::info!("Stage 3/3 done");
    Ok(report)
}
