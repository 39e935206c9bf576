// ============================================================
// Layer 5 — Predictor
// ============================================================
// Loads one model file and answers demand queries with it.
//
// Read-only after load: the web layer shares one Predictor
// across requests behind an Arc, with no locking.
//
// Query path:
//   (hour, day, row, col)
//       → FeatureInput { hour_of_day: hour, day_of_week: day mod 7, row, column: col }
//       → model schema order
//       → forest prediction, rounded to the nearest integer

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::domain::features::{FeatureInput, FeatureRow, ForecastRow, DAYS_PER_WEEK};
use crate::infra::model_store::ModelStore;
use crate::ml::model::DemandModel;

pub struct Predictor {
    model:  DemandModel,
    source: PathBuf,
}

impl Predictor {
    /// Load and schema-check a model file.
    pub fn load(path: &Path) -> Result<Self> {
        let model = ModelStore::load(path)?;
        Ok(Self { model, source: path.to_path_buf() })
    }

    pub fn from_model(model: DemandModel, source: impl Into<PathBuf>) -> Self {
        Self { model, source: source.into() }
    }

    /// File name of the loaded model, for display
    pub fn model_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn model(&self) -> &DemandModel {
        &self.model
    }

    /// Map a validated request onto the feature layout.
    /// `day` is an unbounded day count; only its weekday reaches the model.
    pub fn query_input(hour: u32, day: i64, row: u32, column: u32) -> FeatureInput {
        FeatureInput {
            hour_of_day: hour,
            day_of_week: day.rem_euclid(DAYS_PER_WEEK) as u32,
            row,
            column,
        }
    }

    /// Rounded demand for one cell and time.
    pub fn predict_one(&self, input: FeatureInput) -> Result<i64> {
        let y = self.model.predict(&[input])?;
        Ok(round_demand(y.first().copied().unwrap_or_default()))
    }

    /// Rounded demand for every row of a processed partition.
    pub fn forecast(&self, rows: &[FeatureRow]) -> Result<Vec<ForecastRow>> {
        let inputs: Vec<FeatureInput> = rows.iter().map(FeatureRow::input).collect();
        let preds = self.model.predict(&inputs)?;

        Ok(rows
            .iter()
            .zip(preds)
            .map(|(r, y)| ForecastRow {
                time:   r.time,
                row:    r.row,
                column: r.column,
                demand: round_demand(y),
            })
            .collect())
    }
}

fn round_demand(y: f64) -> i64 {
    y.round() as i64
}
