// ============================================================
// Layer 1 — Prediction API Types
// ============================================================
// JSON bodies of the prediction service.
//
//   POST /predict  {"hour": 10, "day": 3, "row": 2, "col": 4}
//               →  {"demand": 17}
//
//   GET  /health   →  {"status": "ok", "model": "model_3.mpk.gz"}
//
// Request fields arrive as signed integers so that negative
// values reach `validate` and get a descriptive 422 instead
// of a generic deserialization rejection.

use serde::{Deserialize, Serialize};

use crate::domain::features::FeatureInput;
use crate::ml::inferencer::Predictor;

pub const MAX_HOUR:     i64 = 23;
pub const GRID_MAX_ROW: i64 = 7;
pub const GRID_MAX_COL: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub hour: i64,
    pub day:  i64,
    pub row:  i64,
    pub col:  i64,
}

impl PredictRequest {
    /// Check bounds and map onto the model's feature layout.
    pub fn validate(&self) -> Result<FeatureInput, String> {
        let mut problems = Vec::new();
        if !(0..=MAX_HOUR).contains(&self.hour) {
            problems.push(format!("hour must be in [0, {MAX_HOUR}], got {}", self.hour));
        }
        if self.day < 0 {
            problems.push(format!("day must be a non-negative integer, got {}", self.day));
        }
        if !(0..=GRID_MAX_ROW).contains(&self.row) {
            problems.push(format!("row must be in [0, {GRID_MAX_ROW}], got {}", self.row));
        }
        if !(0..=GRID_MAX_COL).contains(&self.col) {
            problems.push(format!("col must be in [0, {GRID_MAX_COL}], got {}", self.col));
        }
        if !problems.is_empty() {
            return Err(problems.join("; "));
        }

        Ok(Predictor::query_input(
            self.hour as u32,
            self.day,
            self.row as u32,
            self.col as u32,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub demand: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model:  String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(hour: i64, day: i64, row: i64, col: i64) -> PredictRequest {
        PredictRequest { hour, day, row, col }
    }

    #[test]
    fn test_valid_request_maps_to_features() {
        let input = req(10, 9, 2, 4).validate().unwrap();
        assert_eq!(input.hour_of_day, 10);
        assert_eq!(input.day_of_week, 2);
        assert_eq!((input.row, input.column), (2, 4));
    }

    #[test]
    fn test_day_has_no_upper_bound() {
        let input = req(10, 5_000_000_000, 2, 4).validate().unwrap();
        assert_eq!(input.day_of_week, (5_000_000_000i64 % 7) as u32);
        assert!(req(10, i64::MAX, 2, 4).validate().is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(req(0, 0, 0, 0).validate().is_ok());
        assert!(req(23, 1000, 7, 7).validate().is_ok());
    }

    #[test]
    fn test_each_violation_is_reported() {
        assert!(req(24, 0, 0, 0).validate().unwrap_err().contains("hour"));
        assert!(req(0, -1, 0, 0).validate().unwrap_err().contains("day"));
        assert!(req(0, 0, 9, 0).validate().unwrap_err().contains("row"));
        assert!(req(0, 0, 0, -1).validate().unwrap_err().contains("col"));

        let all = req(-1, -1, 8, 8).validate().unwrap_err();
        assert_eq!(all.matches(';').count(), 3);
    }
}
