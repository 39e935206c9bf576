// ============================================================
// Layer 5 — Demand Model
// ============================================================
// A random-forest regressor together with everything needed to
// use it correctly later:
//   - the FeatureSchema it was trained against
//   - the hyperparameters it was built with
//   - its validation RMSE, once evaluated
//
// The ensemble itself comes from smartcore; this module only
// turns FeatureRows into the dense matrix it expects.
//
// Matrix layout (schema v1), one row per sample:
//
//   [hour_of_day, day_of_week, row, column]
//
// Why keep the schema inside the model?
//   The forest only sees column positions, never names. If a
//   later build reorders or adds a feature, an old forest would
//   still happily predict from the wrong columns. Storing the
//   schema lets ModelStore::load refuse such a file up front.
//
// Why a random forest?
//   Demand depends on hour, weekday and location in ways that
//   interact (a busy corner at 8am is quiet at 3am). Averaging
//   many deep trees captures those interactions without any
//   feature scaling, and with four integer features the whole
//   ensemble stays small enough to serialise in one file.
//
// Subsampling (max_samples):
//   When set, the fit uses a seeded subset of ceil(N * frac)
//   training rows, drawn without replacement and kept in input
//   order. Each tree still bootstraps inside smartcore; this
//   only caps how much data reaches it.
//     max_samples: 0.25, N = 10_000  →  2_500 rows reach the forest
//     max_samples: none              →  all 10_000
//
// Every split considers all four features (smartcore's `m`).
// Its default of sqrt(width) would leave only two candidate
// columns per split, which is too few with a schema this narrow.
//
// Same seed + same rows + same params → same forest, so a
// training run can be reproduced exactly from its logged params.
//
// Reference: smartcore::ensemble::random_forest_regressor

use anyhow::{anyhow, bail, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::collections::BTreeMap;

use crate::domain::error::PipelineError;
use crate::domain::features::{FeatureInput, FeatureRow, FeatureSchema};
use crate::infra::config::TrainerConfig;

pub type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

// ─── ForestParams ────────────────────────────────────────────────────────────
/// Hyperparameters handed to the ensemble trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees:           usize,
    pub max_depth:         Option<u16>,
    /// Fraction of training rows used for the fit, in (0, 1]
    pub max_samples:       Option<f64>,
    pub min_samples_split: usize,
    pub seed:              u64,
}

impl ForestParams {
    pub fn from_config(cfg: &TrainerConfig) -> Self {
        Self {
            n_trees:           cfg.n_estimators,
            max_depth:         cfg.max_depth,
            max_samples:       cfg.max_samples,
            min_samples_split: cfg.min_samples_split,
            seed:              cfg.seed,
        }
    }

    fn to_smartcore(&self, n_features: usize) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            n_trees:           self.n_trees,
            m:                 Some(n_features),
            max_depth:         self.max_depth,
            min_samples_split: self.min_samples_split,
            seed:              self.seed,
            ..Default::default()
        }
    }

    /// Flat string view for experiment tracking
    pub fn as_map(&self) -> BTreeMap<String, String> {
        let opt = |v: Option<String>| v.unwrap_or_else(|| "none".to_string());
        BTreeMap::from([
            ("n_estimators".to_string(),      self.n_trees.to_string()),
            ("max_depth".to_string(),         opt(self.max_depth.map(|d| d.to_string()))),
            ("max_samples".to_string(),       opt(self.max_samples.map(|f| f.to_string()))),
            ("min_samples_split".to_string(), self.min_samples_split.to_string()),
            ("seed".to_string(),              self.seed.to_string()),
        ])
    }

    /// How many of `total` rows the fit may use
    pub fn sample_size(&self, total: usize) -> usize {
        match self.max_samples {
            Some(frac) => ((total as f64 * frac).ceil() as usize).clamp(1, total.max(1)),
            None       => total,
        }
    }
}

// ─── DemandModel ─────────────────────────────────────────────────────────────
#[derive(Debug, Serialize, Deserialize)]
pub struct DemandModel {
    schema:       FeatureSchema,
    params:       ForestParams,
    rmse:         Option<f64>,
    trained_rows: usize,
    forest:       Forest,
}

impl DemandModel {
    /// Fit a forest on labelled feature rows.
    pub fn fit(params: ForestParams, rows: &[FeatureRow]) -> Result<Self> {
        if rows.is_empty() {
            return Err(PipelineError::EmptyPartition("train").into());
        }

        let schema = FeatureSchema::current();
        let sample = subsample(rows, params.sample_size(rows.len()), params.seed);

        let inputs: Vec<FeatureInput> = sample.iter().map(FeatureRow::input).collect();
        let labels: Vec<f64>          = sample.iter().map(|r| r.value as f64).collect();
        let x = to_matrix(&schema, &inputs);

        tracing::debug!(
            "Fitting forest: {} trees on {} of {} rows, {} features",
            params.n_trees,
            sample.len(),
            rows.len(),
            schema.width(),
        );

        let forest = Forest::fit(&x, &labels, params.to_smartcore(schema.width()))
            .map_err(|e| anyhow!("random forest fit failed: {e:?}"))?;

        Ok(Self {
            schema,
            params,
            rmse: None,
            trained_rows: sample.len(),
            forest,
        })
    }

    /// Raw (unrounded) predictions, one per input.
    pub fn predict(&self, inputs: &[FeatureInput]) -> Result<Vec<f64>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let x = to_matrix(&self.schema, inputs);
        let y = self
            .forest
            .predict(&x)
            .map_err(|e| anyhow!("random forest prediction failed: {e:?}"))?;
        if y.len() != inputs.len() {
            bail!("model returned {} predictions for {} inputs", y.len(), inputs.len());
        }
        Ok(y)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn rmse(&self) -> Option<f64> {
        self.rmse
    }

    pub fn set_rmse(&mut self, rmse: f64) {
        self.rmse = Some(rmse);
    }

    pub fn trained_rows(&self) -> usize {
        self.trained_rows
    }

    #[cfg(test)]
    pub(crate) fn set_schema(&mut self, schema: FeatureSchema) {
        self.schema = schema;
    }
}

fn to_matrix(schema: &FeatureSchema, inputs: &[FeatureInput]) -> DenseMatrix<f64> {
    DenseMatrix::new(inputs.len(), schema.width(), schema.flatten(inputs), false)
}

/// Seeded subsample without replacement; returns everything when `k >= len`.
fn subsample(rows: &[FeatureRow], k: usize, seed: u64) -> Vec<FeatureRow> {
    if k >= rows.len() {
        return rows.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut idx: Vec<usize> = rand::seq::index::sample(&mut rng, rows.len(), k).into_vec();
    idx.sort_unstable();
    idx.into_iter().map(|i| rows[i]).collect()
}
