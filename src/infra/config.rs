// ============================================================
// Layer 6 — Configuration Loader
// ============================================================
// Reads the YAML configuration document once per process and
// hands a typed AppConfig to every use case.
//
// Checks, in order:
//   1. the path is an existing file       → NotFound
//   2. the extension is `.yaml`           → Format
//   3. the document is valid YAML         → Parse
//   4. every required key is present      → Format
//   5. values are in range                → Format
//
// Example document:
//
//   data_ingestion:
//     data_source: local
//     source: data/grid.txt
//     artifact_dir: artifacts
//     train_ratio: 0.8
//     val_ratio: 0.2
//     seed: 42
//   data_processing:
//     shift: 0
//   model_trainer:
//     n_estimators: 100
//     max_depth: 12
//     max_samples: 0.8
//     experiment_name: grid-demand
//     save_model_path: models
//     tracking_dir: mlruns
//   web:
//     model: models
//     model_name: model_3.mpk.gz
//     host: 127.0.0.1
//     port: 8000
//
// Reference: serde_yaml crate documentation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::error::PipelineError;

const CONFIG_EXTENSION: &str = "yaml";

// ─── Sections ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data_ingestion:  IngestionConfig,
    pub data_processing: ProcessingConfig,
    pub model_trainer:   TrainerConfig,
    pub web:             WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Kind of source. Only "local" is supported
    pub data_source:  String,
    /// Path of the grid file
    pub source:       PathBuf,
    /// Where partitions and processed tables are written
    pub artifact_dir: PathBuf,
    pub train_ratio:  f64,
    #[serde(default)]
    pub val_ratio:    Option<f64>,
    /// Informational only; the test partition is the set of sentinel cells
    #[serde(default)]
    pub test_ratio:   Option<f64>,
    #[serde(default = "default_seed")]
    pub seed:         u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    Local,
}

impl IngestionConfig {
    pub fn source_kind(&self) -> Result<DataSourceKind, PipelineError> {
        match self.data_source.as_str() {
            "local" => Ok(DataSourceKind::Local),
            other   => Err(PipelineError::Format(format!(
                "data source '{other}' is not supported"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Hours added to every time index before calendar fields are derived
    #[serde(default)]
    pub shift: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub n_estimators:      usize,
    #[serde(default)]
    pub max_depth:         Option<u16>,
    /// Fraction of training rows each fit may see, in (0, 1]
    #[serde(default)]
    pub max_samples:       Option<f64>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_seed")]
    pub seed:              u64,
    pub experiment_name:   String,
    pub save_model_path:   PathBuf,
    /// Experiment tracking is disabled when absent
    #[serde(default)]
    pub tracking_dir:      Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Directory holding model files
    pub model:      PathBuf,
    /// File name of the model to serve
    pub model_name: String,
    pub host:       String,
    pub port:       u16,
}

impl WebConfig {
    pub fn model_path(&self) -> PathBuf {
        self.model.join(&self.model_name)
    }
}

fn default_seed() -> u64 {
    42
}

fn default_min_samples_split() -> usize {
    2
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Load the raw YAML document as a nested mapping.
pub fn load_document(path: &Path) -> Result<serde_yaml::Value, PipelineError> {
    if !path.is_file() {
        tracing::error!("Configuration file not found: {}", path.display());
        return Err(PipelineError::not_found("configuration file", path));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if ext != CONFIG_EXTENSION {
        tracing::error!("Invalid configuration file format: '.{ext}'");
        return Err(PipelineError::Format(format!(
            "configuration file must have a .{CONFIG_EXTENSION} extension, got '{}'",
            path.display()
        )));
    }

    let text = fs::read_to_string(path).map_err(|e| {
        PipelineError::Format(format!("cannot read '{}': {e}", path.display()))
    })?;

    let doc = serde_yaml::from_str(&text).map_err(|e| {
        let line = e.location().map(|l| l.line()).unwrap_or(0);
        PipelineError::parse(line, format!("invalid YAML in '{}': {e}", path.display()))
    })?;

    tracing::info!("Configuration loaded from {}", path.display());
    Ok(doc)
}

impl AppConfig {
    /// Load, deserialize and validate the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let doc    = load_document(path)?;
        let config = Self::from_document(doc)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_document(doc: serde_yaml::Value) -> Result<Self, PipelineError> {
        serde_yaml::from_value(doc)
            .map_err(|e| PipelineError::Format(format!("invalid configuration: {e}")))
    }

    /// Range checks that serde cannot express.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let ing = &self.data_ingestion;
        if !(0.0..=1.0).contains(&ing.train_ratio) {
            return Err(PipelineError::Format(format!(
                "data_ingestion.train_ratio must be in [0, 1], got {}",
                ing.train_ratio
            )));
        }
        if let Some(val) = ing.val_ratio {
            if (ing.train_ratio + val - 1.0).abs() > 1e-9 {
                tracing::warn!(
                    "train_ratio ({}) + val_ratio ({}) != 1; the split uses train_ratio only",
                    ing.train_ratio,
                    val
                );
            }
        }

        let mt = &self.model_trainer;
        if mt.n_estimators == 0 {
            return Err(PipelineError::Format(
                "model_trainer.n_estimators must be greater than zero".to_string(),
            ));
        }
        if let Some(frac) = mt.max_samples {
            if !(frac > 0.0 && frac <= 1.0) {
                return Err(PipelineError::Format(format!(
                    "model_trainer.max_samples must be in (0, 1], got {frac}"
                )));
            }
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
data_ingestion:
  data_source: local
  source: data/grid.txt
  artifact_dir: artifacts
  train_ratio: 0.8
  val_ratio: 0.2
data_processing:
  shift: 3
model_trainer:
  n_estimators: 10
  max_depth: 6
  max_samples: 0.5
  experiment_name: test
  save_model_path: models
web:
  model: models
  model_name: model_1.mpk.gz
  host: 127.0.0.1
  port: 8000
"#;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_loads_sample_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&write(dir.path(), "config.yaml", SAMPLE)).unwrap();

        assert_eq!(cfg.data_ingestion.train_ratio, 0.8);
        assert_eq!(cfg.data_ingestion.seed, 42);
        assert_eq!(cfg.data_processing.shift, 3);
        assert_eq!(cfg.model_trainer.max_depth, Some(6));
        assert_eq!(cfg.model_trainer.min_samples_split, 2);
        assert!(cfg.model_trainer.tracking_dir.is_none());
        assert_eq!(cfg.web.model_path(), PathBuf::from("models/model_1.mpk.gz"));
    }

    #[test]
    fn test_document_is_a_nested_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load_document(&write(dir.path(), "config.yaml", SAMPLE)).unwrap();
        assert_eq!(doc["web"]["port"].as_u64(), Some(8000));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_document(Path::new("/nope/config.yaml")).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn test_wrong_extension_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&write(dir.path(), "config.json", SAMPLE)).unwrap_err();
        assert!(matches!(err, PipelineError::Format(_)));
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&write(dir.path(), "config.yaml", "a: [1, 2\n")).unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }

    #[test]
    fn test_missing_key_is_format_error() {
        let dir  = tempfile::tempdir().unwrap();
        let text = SAMPLE.replace("  train_ratio: 0.8\n", "");
        let err  = AppConfig::load(&write(dir.path(), "config.yaml", &text)).unwrap_err();
        let msg  = err.to_string();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::Format(_))));
        assert!(msg.contains("train_ratio"), "{msg}");
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let text = SAMPLE.replace("max_samples: 0.5", "max_samples: 1.5");
        assert!(AppConfig::load(&write(dir.path(), "config.yaml", &text)).is_err());

        let text = SAMPLE.replace("train_ratio: 0.8", "train_ratio: 1.2");
        assert!(AppConfig::load(&write(dir.path(), "config.yaml", &text)).is_err());
    }

    #[test]
    fn test_unsupported_data_source() {
        let dir  = tempfile::tempdir().unwrap();
        let text = SAMPLE.replace("data_source: local", "data_source: s3");
        let cfg  = AppConfig::load(&write(dir.path(), "config.yaml", &text)).unwrap();
        assert!(matches!(cfg.data_ingestion.source_kind(), Err(PipelineError::Format(_))));
    }
}
