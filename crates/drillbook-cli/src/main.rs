//! drillbook command-line application.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use drillbook_core::TrainingPlannerBuilder;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        config,
        catalog,
        seed,
        no_color,
        command,
    } = Args::parse();

    let planner = TrainingPlannerBuilder::new()
        .with_database_path(database_file)
        .with_config_path(config)
        .with_catalog_path(catalog)
        .with_seed(seed)
        .build()
        .await
        .context("Failed to initialize planner")?;

    info!("drillbook started");
    let cli = Cli::new(planner, TerminalRenderer::new(!no_color));

    match command {
        Plan { command } => cli.handle_plan_command(command).await,
        Catalog { command } => cli.handle_catalog_command(command),
        Load { command } => cli.handle_load_command(command).await,
        Usage(args) => cli.show_usage(args).await,
    }
}
