// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, loads the configuration once and
// routes to a Layer 2 use case. No pipeline logic lives here.
//
//   grid-demand [--config config/config.yaml] [-v] <command>
//
// Reference: clap derive tutorial

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::application::{
    ingest_use_case::IngestUseCase,
    process_use_case::ProcessUseCase,
    run_pipeline,
    train_use_case::{TrainReport, TrainUseCase},
};
use crate::infra::{config::AppConfig, logging::DEFAULT_LOG_DIR};
use crate::ml::inferencer::Predictor;
use crate::web::{self, AppState};
use commands::{Commands, ServeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "grid-demand",
    version,
    about = "Ingest a snapshot grid of demand readings, train a random-forest forecaster and serve predictions."
)]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, default_value = "config/config.yaml")]
    pub config: PathBuf,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory for the daily log file
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = AppConfig::load(&self.config)?;

        match self.command {
            Commands::Ingest => {
                let r = IngestUseCase::new(&config).execute()?;
                println!(
                    "Ingested {} cells: {} train, {} validation, {} test",
                    r.total(),
                    r.train,
                    r.validation,
                    r.test
                );
            }
            Commands::Process => {
                ProcessUseCase::new(&config).execute()?;
                println!("Processed partitions written.");
            }
            Commands::Train => {
                let r = TrainUseCase::new(&config).execute()?;
                print_train_report(&r);
            }
            Commands::Run => {
                let r = run_pipeline(&config)?;
                print_train_report(&r);
            }
            Commands::Serve(args) => run_serve(&config, args)?,
        }
        Ok(())
    }
}

fn print_train_report(r: &TrainReport) {
    println!("Validation RMSE: {:.4}", r.rmse);
    println!("Model saved to:  {}", r.model_path.display());
    println!("Test forecast:   {} ({} cells)", r.predictions_path.display(), r.forecast_rows);
}

/// Load the model, then block on the service until Ctrl-C.
fn run_serve(config: &AppConfig, args: ServeArgs) -> Result<()> {
    let settings  = args.resolve(&config.web);
    let predictor = Predictor::load(&settings.model_path)?;
    let state     = AppState::new(predictor);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot start the async runtime")?;
    runtime.block_on(web::serve(&settings.host, settings.port, state))
}
