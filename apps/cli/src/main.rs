//! walkscore CLI: enrich a table of cities with their walk scores.
//!
//! Reads `input_cities.csv`, fetches each city's page, and prints
//! `label,region_code,locality_name,score` rows to stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
