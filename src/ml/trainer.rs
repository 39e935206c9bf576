// ============================================================
// Layer 5 — Trainer / Evaluator
// ============================================================
// Thin wrappers around DemandModel that name the three steps
// a training run goes through:
//
//   create_model    hyperparameters from the config section
//   train_model     fit on the train partition
//   evaluate_model  RMSE on the validation partition
//
// RMSE = sqrt( mean( (prediction - label)^2 ) )
//
// Predictions are compared unrounded; rounding only happens
// when a demand value is reported to a user.
//
// Reading the number: RMSE is in demand units. An RMSE of 3
// means a typical validation cell is off by about three
// requests, with large misses weighted more than small ones.
// It also names the saved file (model_3.mpk.gz).

use anyhow::Result;

use crate::domain::error::PipelineError;
use crate::domain::features::{FeatureInput, FeatureRow};
use crate::infra::config::TrainerConfig;
use crate::ml::model::{DemandModel, ForestParams};

pub fn create_model(cfg: &TrainerConfig) -> ForestParams {
    ForestParams::from_config(cfg)
}

pub fn train_model(params: &ForestParams, train: &[FeatureRow]) -> Result<DemandModel> {
    tracing::info!(
        "Training random forest: {} trees, max_depth={:?}, {} rows",
        params.n_trees,
        params.max_depth,
        train.len(),
    );
    DemandModel::fit(params.clone(), train)
}

/// Score `model` on held-out rows; returns the RMSE.
pub fn evaluate_model(model: &DemandModel, validation: &[FeatureRow]) -> Result<f64> {
    if validation.is_empty() {
        return Err(PipelineError::EmptyPartition("validation").into());
    }

    let inputs: Vec<FeatureInput> = validation.iter().map(FeatureRow::input).collect();
    let labels: Vec<f64>          = validation.iter().map(|r| r.value as f64).collect();
    let preds                     = model.predict(&inputs)?;

    let score = rmse(&labels, &preds);
    tracing::info!("Validation RMSE = {score:.4} over {} rows", validation.len());
    Ok(score)
}

/// Root-mean-squared error over paired slices. Zero for empty input.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (p - a) * (p - a))
        .sum();
    (sse / n as f64).sqrt()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{hourly_rows, sample_config};

    #[test]
    fn test_rmse_known_values() {
        assert_eq!(rmse(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
        // errors 3 and 4 → sqrt((9 + 16) / 2)
        let r = rmse(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((r - 12.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(rmse(&[], &[]), 0.0);
    }

    #[test]
    fn test_create_model_copies_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = sample_config(dir.path());
        let p   = create_model(&cfg.model_trainer);
        assert_eq!(p.n_trees, cfg.model_trainer.n_estimators);
        assert_eq!(p.max_depth, cfg.model_trainer.max_depth);
        assert_eq!(p.seed, cfg.model_trainer.seed);
    }

    #[test]
    fn test_train_then_evaluate_scores_low_on_learnable_data() {
        let dir   = tempfile::tempdir().unwrap();
        let cfg   = sample_config(dir.path());
        let rows  = hourly_rows(7);
        let model = train_model(&create_model(&cfg.model_trainer), &rows).unwrap();

        let score = evaluate_model(&model, &hourly_rows(2)).unwrap();
        assert!(score < 10.0, "rmse {score}");
    }

    #[test]
    fn test_evaluate_rejects_empty_validation() {
        let dir   = tempfile::tempdir().unwrap();
        let cfg   = sample_config(dir.path());
        let model = train_model(&create_model(&cfg.model_trainer), &hourly_rows(1)).unwrap();

        let err = evaluate_model(&model, &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::EmptyPartition("validation"))
        ));
    }
}
