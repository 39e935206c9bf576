// Shared fixtures for unit tests across layers.

use std::{fs, path::Path};

use crate::data::feature_engineer::FeatureEngineer;
use crate::domain::features::FeatureRow;
use crate::domain::observation::Observation;
use crate::infra::config::AppConfig;
use crate::ml::model::{DemandModel, ForestParams};

/// T=1, 2x2 grid with one sentinel
pub const TINY_GRID: &str = "1\n2 2\n5 -1\n3 7\n";

/// Demand that depends only on the hour: 10 at night, 50 by day
pub fn hourly_rows(days: u32) -> Vec<FeatureRow> {
    let obs: Vec<Observation> = (0..days * 24)
        .flat_map(|t| {
            let v = if (8..20).contains(&(t % 24)) { 50 } else { 10 };
            (0..2).map(move |r| Observation::new(t, r, 0, v))
        })
        .collect();
    FeatureEngineer::new(0).transform(&obs)
}

pub fn fitted_model() -> DemandModel {
    let params = ForestParams {
        n_trees:           6,
        max_depth:         Some(6),
        max_samples:       None,
        min_samples_split: 2,
        seed:              11,
    };
    DemandModel::fit(params, &hourly_rows(3)).unwrap()
}

/// Grid text with `days` of hourly 2x2 snapshots; every 5th cell is a sentinel.
pub fn grid_text(days: u32) -> String {
    let t = days * 24;
    let mut s = format!("{t}\n2 2\n");
    let mut n = 0u32;
    for time in 0..t {
        for _row in 0..2 {
            let cells: Vec<String> = (0..2)
                .map(|_| {
                    n += 1;
                    if n % 5 == 0 {
                        "-1".to_string()
                    } else if (8..20).contains(&(time % 24)) {
                        "50".to_string()
                    } else {
                        "10".to_string()
                    }
                })
                .collect();
            s.push_str(&cells.join(" "));
            s.push('\n');
        }
    }
    s
}

/// A complete configuration whose paths all live under `dir`.
/// The grid file is written to `dir/data/grid.txt`.
pub fn sample_config(dir: &Path) -> AppConfig {
    let data = dir.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("grid.txt"), grid_text(4)).unwrap();

    let yaml = format!(
        r#"
data_ingestion:
  data_source: local
  source: {root}/data/grid.txt
  artifact_dir: {root}/artifacts
  train_ratio: 0.8
  val_ratio: 0.2
  seed: 7
data_processing:
  shift: 0
model_trainer:
  n_estimators: 8
  max_depth: 6
  experiment_name: test
  save_model_path: {root}/models
  tracking_dir: {root}/mlruns
web:
  model: {root}/models
  model_name: model_0.mpk.gz
  host: 127.0.0.1
  port: 0
"#,
        root = dir.display()
    );
    let path = dir.join("config.yaml");
    fs::write(&path, yaml).unwrap();
    AppConfig::load(&path).unwrap()
}
