// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// pipeline works on:
//
//   observation.rs — grid cells, the grid descriptor, partitions
//   features.rs    — feature rows and the versioned feature schema
//   error.rs       — typed failures (not found, format, parse, ...)
//   traits.rs      — seams implemented by the data and infra layers
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO model library types
//   - Only plain Rust structs, enums, and traits

pub mod observation;

pub mod features;

pub mod error;

pub mod traits;
