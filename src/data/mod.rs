// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw grid file and the model-ready
// feature tables.
//
//   grid file
//       │
//       ▼
//   GridFileSource    → decodes snapshots, routes sentinels
//       │
//       ▼
//   split_train_val   → seeded shuffle, cut at floor(N * ratio)
//       │
//       ▼
//   PartitionStore    → train/test/validation CSVs
//       │
//       ▼
//   FeatureEngineer   → sort, shift, hour_of_day, day_of_week
//       │
//       ▼
//   PartitionStore    → processed_*.csv for the trainer

/// Decodes the plain-text snapshot grid
pub mod grid_parser;

/// Seeded shuffle and train/validation split
pub mod splitter;

/// Calendar feature derivation
pub mod feature_engineer;

/// CSV persistence of partitions and forecasts
pub mod partition_store;
