// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Five subcommands, one per pipeline stage plus the runners:
//
//   ingest    grid file → raw partitions
//   process   raw partitions → feature tables
//   train     feature tables → model, forecast, tracked run
//   run       ingest + process + train
//   serve     HTTP prediction service
//
// Everything else comes from the YAML configuration; only
// `serve` takes overrides, for pointing at another model or
// port without editing the file.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::infra::config::WebConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode the grid file and write train/test/validation partitions
    Ingest,

    /// Derive calendar features for every partition
    Process,

    /// Fit, evaluate and save the random-forest model
    Train,

    /// Run ingest, process and train in sequence
    Run,

    /// Serve predictions over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Model file to serve instead of web.model/web.model_name
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Overrides web.host
    #[arg(long)]
    pub host: Option<String>,

    /// Overrides web.port
    #[arg(long)]
    pub port: Option<u16>,
}

/// Where and what the service runner serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeSettings {
    pub model_path: PathBuf,
    pub host:       String,
    pub port:       u16,
}

impl ServeArgs {
    /// Command-line values win over the `web` section.
    pub fn resolve(self, web: &WebConfig) -> ServeSettings {
        ServeSettings {
            model_path: self.model.unwrap_or_else(|| web.model_path()),
            host:       self.host.unwrap_or_else(|| web.host.clone()),
            port:       self.port.unwrap_or(web.port),
        }
    }
}
