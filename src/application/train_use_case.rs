// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run in order:
//
//   Step 1: Load processed partitions        (Layer 4 - data)
//   Step 2: Build hyperparameters            (Layer 5 - ml)
//   Step 3: Fit on train                     (Layer 5 - ml)
//   Step 4: RMSE on validation               (Layer 5 - ml)
//   Step 5: Save model_<round(rmse)>.mpk.gz  (Layer 6 - infra)
//   Step 6: Forecast the test partition      (Layer 5 - ml)
//   Step 7: Record the run                   (Layer 6 - infra)
//
// The tracked run is opened only in step 7, once every artifact
// exists. A failure in steps 1-6 therefore leaves nothing under
// the tracking directory: no run folder and no runs.csv row.
//
// Step 7 goes through `best_effort`: a broken tracking
// directory costs a warning, not the run.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::partition_store::PartitionStore;
use crate::domain::observation::PartitionKind;
use crate::domain::traits::ExperimentTracker;
use crate::infra::{
    config::AppConfig,
    model_store::ModelStore,
    tracker::{best_effort, tracker_for},
};
use crate::ml::{
    inferencer::Predictor,
    trainer::{create_model, evaluate_model, train_model},
};

/// What a finished training run produced
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub rmse:             f64,
    pub model_path:       PathBuf,
    pub predictions_path: PathBuf,
    pub train_rows:       usize,
    pub validation_rows:  usize,
    pub forecast_rows:    usize,
}

pub struct TrainUseCase<'a> {
    config:  &'a AppConfig,
    tracker: Box<dyn ExperimentTracker>,
}

impl<'a> TrainUseCase<'a> {
    /// Tracker chosen from `model_trainer.tracking_dir`
    pub fn new(config: &'a AppConfig) -> Self {
        let tracker = tracker_for(config.model_trainer.tracking_dir.as_deref());
        Self { config, tracker }
    }

    pub fn with_tracker(config: &'a AppConfig, tracker: Box<dyn ExperimentTracker>) -> Self {
        Self { config, tracker }
    }

    pub fn execute(&mut self) -> Result<TrainReport> {
        let cfg = &self.config.model_trainer;
        tracing::info!("Model training started");

        // ── Step 1: Load processed partitions ────────────────────────────────
        let store      = PartitionStore::new(&self.config.data_ingestion.artifact_dir);
        let train      = store.load_processed(PartitionKind::Train)?;
        let validation = store.load_processed(PartitionKind::Validation)?;
        let test       = store.load_processed(PartitionKind::Test)?;
        tracing::debug!(
            "Loaded {} train, {} validation, {} test rows",
            train.len(),
            validation.len(),
            test.len()
        );

        // ── Step 2: Hyperparameters ──────────────────────────────────────────
        let params = create_model(cfg);

        // ── Step 3–4: Fit and evaluate ────────────────────────────────────────
        let mut model = train_model(&params, &train)?;
        let rmse      = evaluate_model(&model, &validation)?;
        model.set_rmse(rmse);

        // ── Step 5: Persist ──────────────────────────────────────────────────
        let model_path = ModelStore::new(&cfg.save_model_path).save(&model)?;
        tracing::info!("Model saved to '{}'", model_path.display());

        // ── Step 6: Forecast the sentinel cells ──────────────────────────────
        let predictor        = Predictor::from_model(model, &model_path);
        let forecast         = predictor.forecast(&test)?;
        let predictions_path = store.save_predictions(&forecast)?;
        tracing::info!(
            "Forecast {} unknown cells to '{}'",
            forecast.len(),
            predictions_path.display()
        );

        // ── Step 7: Tracking ─────────────────────────────────────────────────
        match self.tracker.start_run(&cfg.experiment_name) {
            Ok(_) => {
                let t = self.tracker.as_mut();
                best_effort("log_params", t.log_params(&params.as_map()));
                best_effort("log_metric", t.log_metric("rmse", rmse));
                best_effort("log_metric", t.log_metric("train_rows", train.len() as f64));
                best_effort("log_artifact", t.log_artifact(&model_path));
                best_effort("log_artifact", t.log_artifact(&predictions_path));
                best_effort("end_run", t.end_run());
            }
            Err(e) => tracing::warn!("Experiment tracking skipped for this run: {e:#}"),
        }

        tracing::info!("Model training completed: rmse={rmse:.4}");
        Ok(TrainReport {
            rmse,
            model_path,
            predictions_path,
            train_rows:      train.len(),
            validation_rows: validation.len(),
            forecast_rows:   forecast.len(),
        })
    }
}
