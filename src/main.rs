#![allow(dead_code)]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;
mod web;

#[cfg(test)]
mod test_helpers;

use anyhow::Result;
use cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    infra::logging::init(cli.verbose, &cli.log_dir);

    cli.run().map_err(|e| {
        tracing::error!("{e:#}");
        e
    })
}
