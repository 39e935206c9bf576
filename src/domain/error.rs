// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Typed failures raised by the pipeline. Application code
// carries them inside `anyhow::Error`, so callers that care
// (tests, the CLI exit path) can still downcast.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required file (config, grid source, model) is missing.
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    /// Wrong config extension, unsupported data source, bad key.
    #[error("format error: {0}")]
    Format(String),

    /// Malformed grid file. `line` is 1-based.
    #[error("parse error at line {line}: {detail}")]
    Parse { line: usize, detail: String },

    /// A stage needs rows that the previous stage did not produce.
    #[error("partition '{0}' is empty")]
    EmptyPartition(&'static str),

    /// Model artifact was trained against a different feature layout.
    #[error("feature schema mismatch: {0}")]
    Schema(String),
}

impl PipelineError {
    pub fn not_found(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound { what, path: path.into() }
    }

    pub fn parse(line: usize, detail: impl Into<String>) -> Self {
        Self::Parse { line, detail: detail.into() }
    }
}
