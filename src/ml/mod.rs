// ============================================================
// Layer 5 — ML / Model Layer (smartcore)
// ============================================================
// The only layer that imports smartcore.
//
//   model.rs      — DemandModel: random forest + feature schema
//                   + hyperparameters + validation RMSE, all in
//                   one serializable value
//
//   trainer.rs    — create / train / evaluate (RMSE)
//
//   inferencer.rs — Predictor: loads a model file and answers
//                   single queries or whole-partition forecasts

/// Random-forest demand model
pub mod model;

/// Fit and RMSE evaluation
pub mod trainer;

/// Loaded model used for serving and forecasting
pub mod inferencer;
