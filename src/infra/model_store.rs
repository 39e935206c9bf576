// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores trained DemandModels.
//
// What gets saved per model (one file):
//   - the feature schema it was trained against
//   - its hyperparameters
//   - its validation RMSE
//   - the fitted forest
//
// Encoding: MessagePack (named fields) compressed with gzip.
//
// File naming convention:
//   models/
//     model_3.mpk.gz    ← validation RMSE rounded to 3
//     model_12.mpk.gz
//
// Two runs whose RMSE rounds to the same integer write the
// same file; the later run wins.
//
// Loading fails with a Schema error when the stored layout
// differs from the one this build computes features with.
//
// Reference: rmp-serde and flate2 crate documentation

use anyhow::{bail, Context, Result};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::error::PipelineError;
use crate::domain::features::FeatureSchema;
use crate::ml::model::DemandModel;

pub const MODEL_EXTENSION: &str = "mpk.gz";

/// Manages model files inside one directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `model_<round(rmse)>.mpk.gz`
    pub fn file_name(rmse: f64) -> String {
        format!("model_{}.{MODEL_EXTENSION}", rmse.round() as u64)
    }

    /// Write an evaluated model and return the path of the new file.
    pub fn save(&self, model: &DemandModel) -> Result<PathBuf> {
        let Some(rmse) = model.rmse() else {
            bail!("cannot save a model that has not been evaluated");
        };

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        let path = self.dir.join(Self::file_name(rmse));
        let file = File::create(&path)
            .with_context(|| format!("Cannot create model file '{}'", path.display()))?;

        let mut enc = GzEncoder::new(BufWriter::new(file), Compression::new(3));
        rmp_serde::encode::write_named(&mut enc, model)
            .with_context(|| format!("Failed to encode model to '{}'", path.display()))?;
        enc.finish()
            .and_then(|mut inner| inner.flush())
            .with_context(|| format!("Failed to finish '{}'", path.display()))?;

        tracing::debug!("Saved model (rmse={rmse:.4}) to '{}'", path.display());
        Ok(path)
    }

    /// Read a model file and check its feature schema.
    pub fn load(path: &Path) -> Result<DemandModel> {
        if !path.is_file() {
            return Err(PipelineError::not_found("model file", path).into());
        }

        let file = File::open(path)
            .with_context(|| format!("Cannot open model file '{}'", path.display()))?;
        let model: DemandModel = rmp_serde::decode::from_read(GzDecoder::new(BufReader::new(file)))
            .with_context(|| format!("Cannot decode model file '{}'", path.display()))?;

        let expected = FeatureSchema::current();
        if model.schema() != &expected {
            return Err(PipelineError::Schema(format!(
                "'{}' was trained on {:?} (v{}), this build computes {:?} (v{})",
                path.display(),
                model.schema().names(),
                model.schema().version,
                expected.names(),
                expected.version,
            ))
            .into());
        }

        tracing::info!("Loaded model from '{}'", path.display());
        Ok(model)
    }
}
